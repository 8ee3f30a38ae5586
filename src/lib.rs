pub mod booking;
pub mod carousel;
pub mod config;
pub mod content;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod templates;
