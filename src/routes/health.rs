use crate::services::trip_planner_service::TripPlanner;
use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::env;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthStatus {
    status: String,
    remote_provider: Option<String>,
    environment: String,
    version: String,
}

/*
    /health
*/
pub async fn health_check(planner: web::Data<TripPlanner>) -> impl Responder {
    let health = HealthStatus {
        status: "ok".to_string(),
        remote_provider: planner.provider_name().map(str::to_string),
        environment: env::var("RUST_ENV").unwrap_or("development".to_string()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    HttpResponse::Ok().json(health)
}
