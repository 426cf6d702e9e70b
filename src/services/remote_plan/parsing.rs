use super::RemotePlanError;
use crate::models::activity::{Activity, ActivityCategory};
use crate::models::expense::Expense;
use crate::models::trip::{Trip, TripDay, TripPlan};
use chrono::{DateTime, Days, NaiveDate};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use serde_with::{serde_as, DefaultOnError};
use std::sync::OnceLock;
use uuid::Uuid;

/// Values used when the model omits or garbles a field.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanDefaults {
    pub today: NaiveDate,
    pub budget: f64,
    /// Days beyond this are dropped from the remote plan.
    pub max_days: u32,
}

fn json_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)```json\s*([\s\S]*?)```").expect("valid json fence regex"))
}

fn any_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```[A-Za-z]*\s*([\s\S]*?)```").expect("valid fence regex"))
}

fn outer_object() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{[\s\S]*\}").expect("valid object regex"))
}

/// Pull the JSON document out of a model reply. Tries a ```json fence, then
/// any fence, then the outermost braces, then the whole text.
pub fn extract_json_payload(content: &str) -> &str {
    for fence in [json_fence(), any_fence()] {
        if let Some(body) = fence.captures(content).and_then(|c| c.get(1)) {
            let body = body.as_str().trim();
            if !body.is_empty() {
                return body;
            }
        }
    }

    outer_object()
        .find(content)
        .map(|m| m.as_str())
        .unwrap_or(content)
        .trim()
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
struct RemoteEnvelope {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    trip: Option<RemoteTrip>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    summary: Option<String>,
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteTrip {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    id: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    destination: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    start_date: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    budget: Option<f64>,
    #[serde(default)]
    days: Option<Value>,
    #[serde(default)]
    expenses: Option<Value>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    total_expenses: f64,
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
struct RemoteDay {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    activities: Vec<RemoteActivity>,
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
struct RemoteActivity {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    id: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    time: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    title: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    description: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    location: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    cost: Option<f64>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    category: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_start_date(raw: Option<String>) -> Option<NaiveDate> {
    let raw = non_blank(raw)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(&raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            raw.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

/// Decode each expense on its own so one bad entry does not take the rest
/// with it. The flag reports whether anything was dropped.
fn decode_expenses(raw: Option<Value>) -> (Vec<Expense>, bool) {
    let Some(Value::Array(entries)) = raw else {
        return (Vec::new(), false);
    };

    let total = entries.len();
    let expenses: Vec<Expense> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .filter(|expense: &Expense| expense.amount.is_finite() && expense.amount > 0.0)
        .collect();
    let dropped = expenses.len() < total;
    (expenses, dropped)
}

/// Check a model-produced plan against the trip schema and repair the
/// fields that can be repaired. Missing `trip`, `summary`, destination or
/// days are rejected.
pub fn validate_remote_plan(value: Value, defaults: &PlanDefaults) -> Result<TripPlan, RemotePlanError> {
    if !value.is_object() {
        return Err(RemotePlanError::InvalidPlan(
            "expected a JSON object".to_string(),
        ));
    }

    let envelope: RemoteEnvelope = serde_json::from_value(value)
        .map_err(|e| RemotePlanError::Unparseable(e.to_string()))?;

    let remote = envelope
        .trip
        .ok_or_else(|| RemotePlanError::InvalidPlan("missing trip".to_string()))?;
    let summary = non_blank(envelope.summary)
        .ok_or_else(|| RemotePlanError::InvalidPlan("missing summary".to_string()))?;
    let destination = non_blank(remote.destination)
        .ok_or_else(|| RemotePlanError::InvalidPlan("missing destination".to_string()))?;

    let mut raw_days = match remote.days {
        Some(Value::Array(days)) if !days.is_empty() => days,
        Some(Value::Array(_)) => {
            return Err(RemotePlanError::InvalidPlan("no days planned".to_string()))
        }
        _ => return Err(RemotePlanError::InvalidPlan("days must be an array".to_string())),
    };
    raw_days.truncate(defaults.max_days.max(1) as usize);

    let days: Vec<TripDay> = raw_days
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let day = index as u32 + 1;
            let parsed: RemoteDay = serde_json::from_value(raw).unwrap_or_default();
            TripDay {
                day,
                activities: parsed
                    .activities
                    .into_iter()
                    .enumerate()
                    .map(|(slot, activity)| normalize_activity(activity, day, slot, &destination))
                    .collect(),
            }
        })
        .collect();

    let span = Days::new(days.len() as u64 - 1);
    let start_date = parse_start_date(remote.start_date)
        .filter(|start| start.checked_add_days(span).is_some())
        .unwrap_or(defaults.today);
    let end_date = start_date
        .checked_add_days(span)
        .ok_or_else(|| RemotePlanError::InvalidPlan("trip dates out of range".to_string()))?;
    let budget = remote
        .budget
        .filter(|b| b.is_finite() && *b > 0.0)
        .unwrap_or(defaults.budget);
    let (expenses, dropped) = decode_expenses(remote.expenses);
    let total_expenses = if dropped {
        expenses.iter().map(|e| e.amount).sum()
    } else if remote.total_expenses.is_finite() {
        remote.total_expenses
    } else {
        0.0
    };

    Ok(TripPlan {
        trip: Trip {
            id: non_blank(remote.id).unwrap_or_else(|| Uuid::new_v4().to_string()),
            destination,
            start_date,
            end_date,
            budget,
            days,
            expenses,
            total_expenses,
        },
        summary,
    })
}

fn normalize_activity(activity: RemoteActivity, day: u32, slot: usize, destination: &str) -> Activity {
    Activity {
        id: non_blank(activity.id).unwrap_or_else(|| format!("day{}-act{}-{}", day, slot + 1, Uuid::new_v4())),
        time: non_blank(activity.time).unwrap_or_default(),
        title: non_blank(activity.title).unwrap_or_else(|| "Activity".to_string()),
        description: non_blank(activity.description).unwrap_or_default(),
        location: non_blank(activity.location).unwrap_or_else(|| destination.to_string()),
        cost: activity
            .cost
            .filter(|c| c.is_finite() && *c >= 0.0)
            .unwrap_or(0.0),
        category: activity
            .category
            .as_deref()
            .map(ActivityCategory::from_loose)
            .unwrap_or(ActivityCategory::Other),
    }
}
