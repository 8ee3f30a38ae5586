pub mod public;
pub mod stories;
