use crate::db::session_store::{SessionError, SessionStore};
use crate::models::chat::PromptRequest;
use crate::models::expense::NewExpense;
use crate::models::trip::Trip;
use crate::routes::session::parse_session_id;
use crate::services::pricing_service::BudgetStatus;
use crate::services::trip_planner_service::TripPlanner;
use actix_web::{web, HttpResponse, Responder};
use chrono::{Local, Utc};

/// Runs `f` against the session's current trip, or answers 404.
fn with_current_trip<F>(raw_id: &str, store: &SessionStore, f: F) -> HttpResponse
where
    F: FnOnce(&Trip) -> HttpResponse,
{
    let id = match parse_session_id(raw_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match store.get(id) {
        Some(session) => match session.current_trip.as_ref() {
            Some(trip) => f(trip),
            None => HttpResponse::NotFound().body("No trip planned yet"),
        },
        None => HttpResponse::NotFound().body(SessionError::NotFound.to_string()),
    }
}

/*
    GET /api/sessions/{session_id}/trip
*/
pub async fn get_trip(path: web::Path<String>, store: web::Data<SessionStore>) -> impl Responder {
    with_current_trip(&path.into_inner(), &store, |trip| HttpResponse::Ok().json(trip))
}

/*
    GET /api/sessions/{session_id}/trip/itinerary
*/
pub async fn get_itinerary(path: web::Path<String>, store: web::Data<SessionStore>) -> impl Responder {
    with_current_trip(&path.into_inner(), &store, |trip| {
        HttpResponse::Ok().json(trip.itinerary())
    })
}

/*
    GET /api/sessions/{session_id}/trip/budget
*/
pub async fn get_budget(path: web::Path<String>, store: web::Data<SessionStore>) -> impl Responder {
    with_current_trip(&path.into_inner(), &store, |trip| {
        HttpResponse::Ok().json(BudgetStatus::for_trip(trip))
    })
}

/*
    POST /api/sessions/{session_id}/trip/expenses
*/
pub async fn add_expense(
    path: web::Path<String>,
    input: web::Json<NewExpense>,
    store: web::Data<SessionStore>,
) -> impl Responder {
    let id = match parse_session_id(&path.into_inner()) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let expense = match input.into_inner().validate(Utc::now()) {
        Ok(expense) => expense,
        Err(err) => return HttpResponse::BadRequest().body(err.to_string()),
    };

    match store.add_expense(id, expense) {
        Ok(Some(trip)) => HttpResponse::Ok().json(trip),
        Ok(None) => HttpResponse::NoContent().finish(),
        Err(err) => HttpResponse::NotFound().body(err.to_string()),
    }
}

/*
    DELETE /api/sessions/{session_id}/trip/expenses/{expense_id}
*/
pub async fn delete_expense(
    path: web::Path<(String, String)>,
    store: web::Data<SessionStore>,
) -> impl Responder {
    let (session_id, expense_id) = path.into_inner();
    let id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match store.remove_expense(id, &expense_id) {
        Ok(Some(trip)) => HttpResponse::Ok().json(trip),
        Ok(None) => HttpResponse::NoContent().finish(),
        Err(err) => HttpResponse::NotFound().body(err.to_string()),
    }
}

/*
    POST /api/trips/synthesize (offline generator only)
*/
pub async fn synthesize(
    input: web::Json<PromptRequest>,
    planner: web::Data<TripPlanner>,
) -> impl Responder {
    let prompt = input.into_inner().prompt;
    let plan = planner.generator().synthesize_trip(
        &prompt,
        Local::now().date_naive(),
        &mut rand::thread_rng(),
    );
    HttpResponse::Ok().json(plan)
}
