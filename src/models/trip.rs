use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{activity::Activity, expense::Expense};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripDay {
    /// 1-based position of the day within the trip.
    pub day: u32,
    pub activities: Vec<Activity>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: f64,
    pub days: Vec<TripDay>,
    pub expenses: Vec<Expense>,
    pub total_expenses: f64,
}

impl Trip {
    /// Calendar date of the day at `index` (0-based). `None` past the end
    /// of the representable calendar.
    pub fn date_for_day(&self, index: usize) -> Option<NaiveDate> {
        self.start_date.checked_add_days(Days::new(index as u64))
    }

    /// Inclusive length of the trip in calendar days.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days().abs() + 1
    }

    /// Days paired with their calendar dates, for display.
    pub fn itinerary(&self) -> Vec<DayView<'_>> {
        self.days
            .iter()
            .enumerate()
            .map_while(|(index, day)| {
                let date = self.date_for_day(index)?;
                Some(DayView {
                    day: day.day,
                    date,
                    label: date.format("%A, %B %-d, %Y").to_string(),
                    activities: &day.activities,
                })
            })
            .collect()
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayView<'a> {
    pub day: u32,
    pub date: NaiveDate,
    pub label: String,
    pub activities: &'a [Activity],
}

/// The pair handed back by both the local generator and a remote provider.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripPlan {
    pub trip: Trip,
    pub summary: String,
}
