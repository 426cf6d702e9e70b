use crate::db::session_store::{SessionError, SessionStore};
use crate::models::chat::PromptRequest;
use crate::models::trip::Trip;
use crate::services::trip_planner_service::{PlanOutcome, PlanSource, TripPlanner};
use actix_web::{web, HttpResponse, Responder};
use chrono::Local;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub trip: Trip,
    pub summary: String,
    pub source: &'static str,
    pub provider: Option<String>,
    pub demo_mode: bool,
    pub notice: Option<String>,
}

impl From<PlanOutcome> for PlanResponse {
    fn from(outcome: PlanOutcome) -> Self {
        let demo_mode = outcome.is_demo_mode();
        let (source, provider) = match outcome.source {
            PlanSource::Remote { provider } => ("remote", Some(provider)),
            PlanSource::Local => ("local", None),
        };
        Self {
            trip: outcome.plan.trip,
            summary: outcome.plan.summary,
            source,
            provider,
            demo_mode,
            notice: outcome.notice,
        }
    }
}

pub(crate) fn parse_session_id(raw: &str) -> Result<Uuid, HttpResponse> {
    Uuid::parse_str(raw).map_err(|_| HttpResponse::BadRequest().body("Invalid session ID"))
}

/*
    POST /api/sessions
*/
pub async fn create_session(store: web::Data<SessionStore>) -> impl Responder {
    HttpResponse::Created().json(store.create())
}

/*
    GET /api/sessions/{session_id}
*/
pub async fn get_session(path: web::Path<String>, store: web::Data<SessionStore>) -> impl Responder {
    let id = match parse_session_id(&path.into_inner()) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match store.get(id) {
        Some(session) => HttpResponse::Ok().json(session),
        None => HttpResponse::NotFound().body(SessionError::NotFound.to_string()),
    }
}

/*
    DELETE /api/sessions/{session_id}
*/
pub async fn delete_session(path: web::Path<String>, store: web::Data<SessionStore>) -> impl Responder {
    let id = match parse_session_id(&path.into_inner()) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match store.remove(id) {
        Ok(_) => HttpResponse::NoContent().finish(),
        Err(err) => HttpResponse::NotFound().body(err.to_string()),
    }
}

/*
    POST /api/sessions/{session_id}/messages
*/
pub async fn send_message(
    path: web::Path<String>,
    input: web::Json<PromptRequest>,
    store: web::Data<SessionStore>,
    planner: web::Data<TripPlanner>,
) -> impl Responder {
    let id = match parse_session_id(&path.into_inner()) {
        Ok(id) => id,
        Err(response) => return response,
    };
    if store.get(id).is_none() {
        return HttpResponse::NotFound().body(SessionError::NotFound.to_string());
    }

    let prompt = input.into_inner().prompt;
    if prompt.trim().is_empty() {
        return HttpResponse::BadRequest().body("Prompt must not be empty");
    }

    let outcome = planner.plan(&prompt, Local::now().date_naive()).await;

    match store.record_plan(id, &prompt, &outcome) {
        Ok(_) => HttpResponse::Ok().json(PlanResponse::from(outcome)),
        Err(err) => HttpResponse::NotFound().body(err.to_string()),
    }
}
