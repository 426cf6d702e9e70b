use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseCategory {
    #[default]
    Accommodation,
    Food,
    Transportation,
    Activities,
    Shopping,
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub amount: f64,
    pub description: String,
    pub category: ExpenseCategory,
    #[serde(deserialize_with = "deserialize_expense_date")]
    pub date: DateTime<Utc>,
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
fn deserialize_expense_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid expense date '{}'", raw)))
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ExpenseError {
    #[error("Please fill in all fields")]
    MissingDescription,
    #[error("Please enter a valid positive number")]
    InvalidAmount,
}

/// Expense input as submitted by the user, before it gets an id and timestamp.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub amount: f64,
    pub description: String,
    #[serde(default)]
    pub category: ExpenseCategory,
}

impl NewExpense {
    pub fn validate(self, now: DateTime<Utc>) -> Result<Expense, ExpenseError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ExpenseError::MissingDescription);
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ExpenseError::InvalidAmount);
        }

        Ok(Expense {
            id: Uuid::new_v4().to_string(),
            amount: self.amount,
            description: description.to_string(),
            category: self.category,
            date: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_assigns_id_and_date() {
        let now = Utc::now();
        let expense = NewExpense {
            amount: 42.5,
            description: "  Dinner at restaurant ".to_string(),
            category: ExpenseCategory::Food,
        }
        .validate(now)
        .unwrap();

        assert!(!expense.id.is_empty());
        assert_eq!(expense.description, "Dinner at restaurant");
        assert_eq!(expense.date, now);
    }

    #[test]
    fn test_validate_rejects_non_positive_amounts() {
        for amount in [0.0, -3.0, f64::NAN] {
            let result = NewExpense {
                amount,
                description: "Taxi".to_string(),
                category: ExpenseCategory::Transportation,
            }
            .validate(Utc::now());
            assert_eq!(result, Err(ExpenseError::InvalidAmount));
        }
    }

    #[test]
    fn test_validate_rejects_blank_description() {
        let result = NewExpense {
            amount: 10.0,
            description: "   ".to_string(),
            category: ExpenseCategory::Other,
        }
        .validate(Utc::now());
        assert_eq!(result, Err(ExpenseError::MissingDescription));
    }

    #[test]
    fn test_expense_date_accepts_plain_dates() {
        let expense: Expense = serde_json::from_value(serde_json::json!({
            "id": "e1",
            "amount": 50,
            "description": "Museum pass",
            "category": "Activities",
            "date": "2026-10-15"
        }))
        .unwrap();
        assert_eq!(expense.date.to_rfc3339(), "2026-10-15T00:00:00+00:00");

        let stamped: Expense = serde_json::from_value(serde_json::json!({
            "id": "e2",
            "amount": 12,
            "description": "Coffee",
            "category": "Food",
            "date": "2026-10-15T09:30:00+02:00"
        }))
        .unwrap();
        assert_eq!(stamped.date.to_rfc3339(), "2026-10-15T07:30:00+00:00");

        let garbled = serde_json::from_value::<Expense>(serde_json::json!({
            "id": "e3",
            "amount": 1,
            "description": "x",
            "category": "Food",
            "date": "yesterday"
        }));
        assert!(garbled.is_err());
    }

    #[test]
    fn test_default_category_is_accommodation() {
        assert_eq!(ExpenseCategory::default(), ExpenseCategory::Accommodation);
    }

    #[test]
    fn test_unknown_category_decodes_as_other() {
        let category: ExpenseCategory = serde_json::from_str("\"Souvenirs\"").unwrap();
        assert_eq!(category, ExpenseCategory::Other);
    }
}
