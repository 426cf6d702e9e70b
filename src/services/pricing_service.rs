use crate::models::activity::ActivityCategory;
use crate::models::trip::{Trip, TripDay};
use serde::Serialize;

pub struct PricingService;

impl PricingService {
    /// Flat sum of every scheduled activity's cost across every day.
    pub fn calculate_estimated_cost(days: &[TripDay]) -> f64 {
        days.iter()
            .flat_map(|day| day.activities.iter())
            .map(|activity| activity.cost.max(0.0))
            .sum()
    }

    /// Scheduled cost restricted to one category, e.g. lodging only.
    pub fn calculate_category_cost(days: &[TripDay], category: ActivityCategory) -> f64 {
        days.iter()
            .flat_map(|day| day.activities.iter())
            .filter(|activity| activity.category == category)
            .map(|activity| activity.cost.max(0.0))
            .sum()
    }
}

/// Budget view of a trip. `estimated_cost` comes from the schedule and is
/// never reconciled with the user-entered expenses.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub budget: f64,
    pub total_expenses: f64,
    pub remaining: f64,
    pub percent_used: f64,
    pub near_limit: bool,
    pub estimated_cost: f64,
}

const NEAR_LIMIT_PERCENT: f64 = 90.0;

impl BudgetStatus {
    pub fn for_trip(trip: &Trip) -> Self {
        let percent_used = if trip.budget > 0.0 {
            (trip.total_expenses / trip.budget * 100.0).min(100.0)
        } else {
            100.0
        };

        Self {
            budget: trip.budget,
            total_expenses: trip.total_expenses,
            remaining: trip.budget - trip.total_expenses,
            percent_used,
            near_limit: percent_used >= NEAR_LIMIT_PERCENT,
            estimated_cost: PricingService::calculate_estimated_cost(&trip.days),
        }
    }
}
