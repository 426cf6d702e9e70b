pub mod health;
pub mod session;
pub mod trip;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check)).service(
        web::scope("/api")
            .route("/trips/synthesize", web::post().to(trip::synthesize))
            .service(
                web::scope("/sessions")
                    .route("", web::post().to(session::create_session))
                    .route("/{session_id}", web::get().to(session::get_session))
                    .route("/{session_id}", web::delete().to(session::delete_session))
                    .route("/{session_id}/messages", web::post().to(session::send_message))
                    .service(
                        web::scope("/{session_id}/trip")
                            .route("", web::get().to(trip::get_trip))
                            .route("/itinerary", web::get().to(trip::get_itinerary))
                            .route("/budget", web::get().to(trip::get_budget))
                            .route("/expenses", web::post().to(trip::add_expense))
                            .route(
                                "/expenses/{expense_id}",
                                web::delete().to(trip::delete_expense),
                            ),
                    ),
            ),
    );
}
