use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;

use trip_compass_api::models::activity::ActivityCategory;
use trip_compass_api::models::expense::{ExpenseCategory, NewExpense};
use trip_compass_api::models::trip::TripPlan;
use trip_compass_api::services::catalog_service::CatalogRegistry;
use trip_compass_api::services::expense_service::{add_expense, remove_expense};
use trip_compass_api::services::itinerary_generation_service::ItineraryGenerator;
use trip_compass_api::services::pricing_service::{BudgetStatus, PricingService};
use trip_compass_api::services::random_source::SequenceRandom;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
}

fn synthesize(prompt: &str, seed: u64) -> TripPlan {
    ItineraryGenerator::default().synthesize_trip(prompt, today(), &mut StdRng::seed_from_u64(seed))
}

fn count(plan: &TripPlan, day: usize, category: ActivityCategory) -> usize {
    plan.trip.days[day]
        .activities
        .iter()
        .filter(|a| a.category == category)
        .count()
}

fn assert_schema_valid(plan: &TripPlan) {
    let trip = &plan.trip;
    assert!(!trip.id.is_empty());
    assert!(trip.budget > 0.0);
    assert_eq!(trip.total_expenses, 0.0);
    assert!(trip.expenses.is_empty());
    assert_eq!(
        trip.end_date,
        trip.start_date + Duration::days(trip.days.len() as i64 - 1)
    );
    for (index, day) in trip.days.iter().enumerate() {
        assert_eq!(day.day as usize, index + 1);
        assert_eq!(day.activities[0].category, ActivityCategory::Accommodation);
        assert!(day.activities.iter().all(|a| a.cost >= 0.0));
    }
}

#[test]
fn test_scenario_london_with_explicit_days_and_budget() {
    let plan = synthesize("3-day trip to London with a budget of $1000", 1);
    assert_schema_valid(&plan);

    assert_eq!(plan.trip.days.len(), 3);
    assert_eq!(plan.trip.destination, "London");
    assert_eq!(plan.trip.budget, 1000.0);

    let registry = CatalogRegistry::with_defaults();
    let london = registry.get("london").unwrap();
    let hotel = &plan.trip.days[0].activities[0].title;
    assert!(london
        .iter()
        .any(|e| &e.title == hotel && e.category == ActivityCategory::Accommodation));
}

#[test]
fn test_scenario_paris_defaults() {
    let plan = synthesize("Weekend in Paris for a couple, focus on romance", 2);
    assert_schema_valid(&plan);

    assert_eq!(plan.trip.destination, "Paris");
    assert_eq!(plan.trip.days.len(), 3);
    assert_eq!(plan.trip.budget, 1000.0);
}

#[test]
fn test_scenario_unknown_destination_uses_generic_catalog() {
    let plan = synthesize("5-day family trip to Zanzibar", 3);
    assert_schema_valid(&plan);

    assert_eq!(plan.trip.destination, "Zanzibar");
    assert_eq!(plan.trip.days.len(), 5);
    for day in 0..5 {
        assert_eq!(count(&plan, day, ActivityCategory::Accommodation), 1);
        assert!(count(&plan, day, ActivityCategory::Attraction) >= 1);
        assert!(count(&plan, day, ActivityCategory::Food) >= 1);
        assert!(count(&plan, day, ActivityCategory::Transportation) >= 1);
    }
    assert!(plan.trip.days[0].activities[0].title.contains("Zanzibar"));
}

#[test]
fn test_known_catalog_days_cover_every_category() {
    for prompt in ["2 days in Tokyo", "4 days in New York for $3000", "a week in paris"] {
        let plan = synthesize(prompt, 7);
        assert_schema_valid(&plan);
        for day in 0..plan.trip.days.len() {
            assert_eq!(count(&plan, day, ActivityCategory::Accommodation), 1);
            assert_eq!(count(&plan, day, ActivityCategory::Attraction), 3);
            assert_eq!(count(&plan, day, ActivityCategory::Food), 2);
            assert_eq!(count(&plan, day, ActivityCategory::Transportation), 1);
        }
    }
}

#[test]
fn test_same_seed_gives_same_schedule() {
    let titles = |plan: &TripPlan| -> Vec<String> {
        plan.trip
            .days
            .iter()
            .flat_map(|d| d.activities.iter().map(|a| a.title.clone()))
            .collect()
    };

    let first = synthesize("4 days in London", 42);
    let second = synthesize("4 days in London", 42);
    assert_eq!(titles(&first), titles(&second));
    assert_ne!(first.trip.id, second.trip.id);
}

#[test]
fn test_summary_reports_estimated_cost_not_expenses() {
    let plan = ItineraryGenerator::default().synthesize_trip(
        "1 day in London for $500",
        today(),
        &mut SequenceRandom::identity(),
    );
    let estimated = PricingService::calculate_estimated_cost(&plan.trip.days);
    // Premier Inn + British Museum + Dishoom + Tower of London + London Eye + Flat Iron + Tube Day Pass
    assert_eq!(estimated, 100.0 + 0.0 + 25.0 + 30.0 + 25.0 + 20.0 + 15.0);
    assert!(plan.summary.contains(&format!("${}", estimated)));
    assert_eq!(plan.trip.total_expenses, 0.0);
}

#[test]
fn test_expenses_leave_estimate_untouched() {
    let plan = synthesize("3 days in Paris for $1200", 9);
    let estimated = BudgetStatus::for_trip(&plan.trip).estimated_cost;

    let expense = NewExpense {
        amount: 300.0,
        description: "Louvre tickets".to_string(),
        category: ExpenseCategory::Activities,
    }
    .validate(chrono::Utc::now())
    .unwrap();
    let expense_id = expense.id.clone();

    let spent = add_expense(&plan.trip, expense);
    let status = BudgetStatus::for_trip(&spent);
    assert_eq!(status.total_expenses, 300.0);
    assert_eq!(status.remaining, 900.0);
    assert_eq!(status.percent_used, 25.0);
    assert_eq!(status.estimated_cost, estimated);

    let restored = remove_expense(&spent, &expense_id);
    assert_eq!(restored, plan.trip);
}
