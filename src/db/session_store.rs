use crate::models::chat::ChatMessage;
use crate::models::expense::Expense;
use crate::models::trip::Trip;
use crate::services::expense_service;
use crate::services::trip_planner_service::PlanOutcome;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

pub const WELCOME_MESSAGE: &str = "Hello! I'm your AI travel planner. Tell me about the trip you want to plan, including your destination, duration, and budget.";

/// One planning conversation and the trip it currently holds.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub messages: Vec<ChatMessage>,
    pub current_trip: Option<Trip>,
    pub demo_mode: bool,
    pub created_at: DateTime<Utc>,
}

impl Session {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: vec![ChatMessage::assistant(WELCOME_MESSAGE)],
            current_trip: None,
            demo_mode: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SessionError {
    #[error("Session not found")]
    NotFound,
}

/// In-memory session storage. Every mutation swaps the session's trip for
/// a freshly built value. Holds at most `max_sessions`; creating one more
/// evicts the oldest.
#[derive(Debug)]
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Session>>,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_max_sessions(DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_sessions(max_sessions: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create(&self) -> Session {
        let session = Session::new();
        let mut sessions = self.lock();

        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .values()
                .min_by_key(|s| s.created_at)
                .map(|s| s.id)
            else {
                break;
            };
            sessions.remove(&oldest);
            log::info!("Evicted session {} (store full)", oldest);
        }

        sessions.insert(session.id, session.clone());
        log::debug!("Created session {}", session.id);
        session
    }

    pub fn get(&self, id: Uuid) -> Option<Session> {
        self.lock().get(&id).cloned()
    }

    pub fn remove(&self, id: Uuid) -> Result<Session, SessionError> {
        let removed = self.lock().remove(&id).ok_or(SessionError::NotFound)?;
        log::debug!("Removed session {}", id);
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append the user's prompt and the planner's reply, and make the
    /// outcome's trip the current one.
    pub fn record_plan(
        &self,
        id: Uuid,
        prompt: &str,
        outcome: &PlanOutcome,
    ) -> Result<Session, SessionError> {
        let mut sessions = self.lock();
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound)?;

        session.messages.push(ChatMessage::user(prompt));
        if let Some(notice) = &outcome.notice {
            session.messages.push(ChatMessage::assistant(notice.clone()));
        }
        session
            .messages
            .push(ChatMessage::assistant(outcome.plan.summary.clone()));
        session.current_trip = Some(outcome.plan.trip.clone());
        session.demo_mode = outcome.is_demo_mode();

        Ok(session.clone())
    }

    /// `Ok(None)` when the session has no trip yet.
    pub fn add_expense(&self, id: Uuid, expense: Expense) -> Result<Option<Trip>, SessionError> {
        self.update_trip(id, |trip| expense_service::add_expense(trip, expense))
    }

    pub fn remove_expense(&self, id: Uuid, expense_id: &str) -> Result<Option<Trip>, SessionError> {
        self.update_trip(id, |trip| expense_service::remove_expense(trip, expense_id))
    }

    fn update_trip<F>(&self, id: Uuid, update: F) -> Result<Option<Trip>, SessionError>
    where
        F: FnOnce(&Trip) -> Trip,
    {
        let mut sessions = self.lock();
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound)?;

        let Some(current) = session.current_trip.as_ref() else {
            return Ok(None);
        };
        let updated = update(current);
        session.current_trip = Some(updated.clone());
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::ChatRole;
    use crate::models::expense::ExpenseCategory;
    use crate::services::itinerary_generation_service::ItineraryGenerator;
    use crate::services::random_source::SequenceRandom;
    use crate::services::trip_planner_service::PlanSource;
    use chrono::NaiveDate;

    fn outcome(notice: Option<&str>) -> PlanOutcome {
        let plan = ItineraryGenerator::default().synthesize_trip(
            "3 days in Paris",
            NaiveDate::from_ymd_opt(2026, 10, 15).unwrap(),
            &mut SequenceRandom::identity(),
        );
        PlanOutcome {
            plan,
            source: PlanSource::Local,
            notice: notice.map(str::to_string),
        }
    }

    fn expense(amount: f64) -> Expense {
        Expense {
            id: Uuid::new_v4().to_string(),
            amount,
            description: "Museum tickets".to_string(),
            category: ExpenseCategory::Activities,
            date: Utc::now(),
        }
    }

    #[test]
    fn test_new_session_starts_with_welcome() {
        let store = SessionStore::new();
        let session = store.create();

        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].role, ChatRole::Assistant);
        assert_eq!(session.messages[0].content, WELCOME_MESSAGE);
        assert!(session.current_trip.is_none());
        assert_eq!(store.get(session.id), Some(session));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_session() {
        let store = SessionStore::new();
        let id = store.create().id;

        assert_eq!(store.remove(id).map(|s| s.id), Ok(id));
        assert!(store.is_empty());
        assert_eq!(store.remove(id), Err(SessionError::NotFound));
    }

    #[test]
    fn test_full_store_evicts_oldest_session() {
        let store = SessionStore::with_max_sessions(2);
        let first = store.create().id;
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = store.create().id;
        std::thread::sleep(std::time::Duration::from_millis(2));
        let third = store.create().id;

        assert_eq!(store.len(), 2);
        assert!(store.get(first).is_none());
        assert!(store.get(second).is_some());
        assert!(store.get(third).is_some());
    }

    #[test]
    fn test_record_plan_appends_transcript() {
        let store = SessionStore::new();
        let id = store.create().id;
        let session = store
            .record_plan(id, "3 days in Paris", &outcome(Some("Demo mode")))
            .unwrap();

        let roles: Vec<ChatRole> = session.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![ChatRole::Assistant, ChatRole::User, ChatRole::Assistant, ChatRole::Assistant]
        );
        assert_eq!(session.messages[1].content, "3 days in Paris");
        assert!(session.demo_mode);
        assert_eq!(session.current_trip.unwrap().destination, "Paris");
    }

    #[test]
    fn test_unknown_session() {
        let store = SessionStore::new();
        let missing = Uuid::new_v4();
        assert!(store.get(missing).is_none());
        assert_eq!(
            store.record_plan(missing, "hi", &outcome(None)).unwrap_err(),
            SessionError::NotFound
        );
        assert_eq!(store.add_expense(missing, expense(5.0)), Err(SessionError::NotFound));
    }

    #[test]
    fn test_expenses_without_trip_are_ignored() {
        let store = SessionStore::new();
        let id = store.create().id;
        assert_eq!(store.add_expense(id, expense(5.0)), Ok(None));
        assert_eq!(store.remove_expense(id, "anything"), Ok(None));
        assert!(store.get(id).unwrap().current_trip.is_none());
    }

    #[test]
    fn test_expense_updates_replace_current_trip() {
        let store = SessionStore::new();
        let id = store.create().id;
        store.record_plan(id, "3 days in Paris", &outcome(None)).unwrap();

        let spent = expense(60.0);
        let spent_id = spent.id.clone();
        let trip = store.add_expense(id, spent).unwrap().unwrap();
        assert_eq!(trip.total_expenses, 60.0);
        assert_eq!(store.get(id).unwrap().current_trip, Some(trip));

        let trip = store.remove_expense(id, &spent_id).unwrap().unwrap();
        assert_eq!(trip.total_expenses, 0.0);
        assert!(trip.expenses.is_empty());
    }
}
