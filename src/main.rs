use std::io;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use trip_compass_api::config::AppConfig;
use trip_compass_api::db::session_store::SessionStore;
use trip_compass_api::routes;
use trip_compass_api::services::catalog_service::CatalogRegistry;
use trip_compass_api::services::itinerary_generation_service::ItineraryGenerator;
use trip_compass_api::services::remote_plan::build_provider;
use trip_compass_api::services::trip_planner_service::TripPlanner;

#[actix_web::main]
async fn main() -> io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let provider = match build_provider(&config.remote) {
        Ok(provider) => provider,
        Err(err) => {
            log::warn!("Remote provider disabled: {}", err);
            None
        }
    };
    match (&provider, config.remote.masked_key()) {
        (Some(p), Some(key)) => log::info!("Using remote provider {} with key {}", p.name(), key),
        _ => log::info!("No remote provider configured, running in demo mode"),
    }

    let generator = ItineraryGenerator::with_config(CatalogRegistry::with_defaults(), config.generation.clone());
    let planner = web::Data::new(TripPlanner::new(generator, provider));
    let sessions = web::Data::new(SessionStore::with_max_sessions(config.max_sessions));

    log::info!("Starting HTTP server on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(planner.clone())
            .app_data(sessions.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
