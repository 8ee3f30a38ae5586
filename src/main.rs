use std::sync::Arc;

use actix_files::Files;
use actix_web::{middleware, web, App, HttpServer};

use prc_repair::{
    config::AppConfig,
    routes,
    state::AppState,
    store::{BookingStore, RestBookingStore},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = run().await {
        eprintln!("Startup error: {err}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let config = AppConfig::from_env();

    let store: Option<Arc<dyn BookingStore>> = match &config.store {
        Some(settings) => {
            let store = RestBookingStore::new(settings, config.store_timeout)?;
            log::info!("Booking store configured at {}", store.endpoint());
            Some(Arc::new(store))
        }
        None => {
            log::warn!("SUPABASE_URL or SUPABASE_ANON_KEY not set. Bookings will be simulated, not stored.");
            None
        }
    };

    let state = AppState::new(store, &config);
    let static_dir = config.static_dir.clone();

    let address = format!("0.0.0.0:{}", config.port);
    log::info!("Starting PRC Repair on http://{address}");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(middleware::Logger::default())
            .service(Files::new("/static", &static_dir).prefer_utf8(true))
            .configure(routes::public::configure)
            .configure(routes::stories::configure)
    })
    .bind(address)?
    .run()
    .await?;

    Ok(())
}
