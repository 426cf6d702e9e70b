#![allow(dead_code)]

use actix_cors::Cors;
use actix_web::dev::ServerHandle;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use std::net::SocketAddr;
use std::sync::Arc;

use trip_compass_api::config::RemoteConfig;
use trip_compass_api::db::session_store::SessionStore;
use trip_compass_api::routes;
use trip_compass_api::services::itinerary_generation_service::ItineraryGenerator;
use trip_compass_api::services::remote_plan::{ProviderKind, RemotePlanProvider};
use trip_compass_api::services::trip_planner_service::TripPlanner;

pub struct TestApp {
    pub planner: web::Data<TripPlanner>,
    pub sessions: web::Data<SessionStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_provider(None)
    }

    pub fn with_provider(provider: Option<Arc<dyn RemotePlanProvider>>) -> Self {
        Self {
            planner: web::Data::new(TripPlanner::new(ItineraryGenerator::default(), provider)),
            sessions: web::Data::new(SessionStore::new()),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.planner.clone())
            .app_data(self.sessions.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::configure)
    }
}

/// A local HTTP server standing in for a model provider. Every request gets
/// the same status and body.
pub struct StubProvider {
    pub addr: SocketAddr,
    handle: ServerHandle,
}

impl StubProvider {
    pub async fn start(status: u16, body: &'static str) -> Self {
        let server = HttpServer::new(move || {
            App::new().default_service(web::to(move || async move {
                let status = actix_web::http::StatusCode::from_u16(status)
                    .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);
                HttpResponse::build(status)
                    .content_type("application/json")
                    .body(body)
            }))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind stub provider");

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_rt::spawn(server);

        Self { addr, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn remote_config(&self, kind: ProviderKind) -> RemoteConfig {
        RemoteConfig {
            provider: Some(kind),
            api_key: Some("test-key-0000".to_string()),
            base_url: Some(self.base_url()),
            timeout_secs: 5,
            ..RemoteConfig::default()
        }
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
