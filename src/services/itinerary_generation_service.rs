use crate::models::trip::{Trip, TripDay, TripPlan};
use crate::services::catalog_service::CatalogRegistry;
use crate::services::extraction_service::{ExtractedTrip, TripExtractor};
use crate::services::pricing_service::PricingService;
use crate::services::random_source::RandomSource;
use crate::services::scheduling_service::DayScheduler;
use chrono::{Duration, NaiveDate};
use uuid::Uuid;

const DEFAULT_TRIP_DAYS: u32 = 3;
const DEFAULT_BUDGET: f64 = 1000.0;
const FALLBACK_DESTINATION: &str = "London";
const MAX_TRIP_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryGenerationConfig {
    pub default_days: u32,
    pub default_budget: f64,
    pub fallback_destination: String,
    pub max_trip_days: u32,
}

impl Default for ItineraryGenerationConfig {
    fn default() -> Self {
        Self {
            default_days: DEFAULT_TRIP_DAYS,
            default_budget: DEFAULT_BUDGET,
            fallback_destination: FALLBACK_DESTINATION.to_string(),
            max_trip_days: MAX_TRIP_DAYS,
        }
    }
}

impl ItineraryGenerationConfig {
    /// Read overrides from the environment, keeping defaults for anything
    /// missing or invalid.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            default_days: std::env::var("TRIP_DEFAULT_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|days: &u32| *days > 0)
                .unwrap_or(defaults.default_days),
            default_budget: std::env::var("TRIP_DEFAULT_BUDGET")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|budget: &f64| budget.is_finite() && *budget > 0.0)
                .unwrap_or(defaults.default_budget),
            fallback_destination: std::env::var("TRIP_FALLBACK_DESTINATION")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.fallback_destination),
            max_trip_days: std::env::var("TRIP_MAX_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|days: &u32| *days > 0)
                .unwrap_or(defaults.max_trip_days),
        }
    }
}

/// Offline itinerary synthesis: extraction, catalog lookup, scheduling,
/// costing and assembly. Holds no mutable state.
#[derive(Debug, Clone)]
pub struct ItineraryGenerator {
    registry: CatalogRegistry,
    config: ItineraryGenerationConfig,
}

impl Default for ItineraryGenerator {
    fn default() -> Self {
        Self::new(CatalogRegistry::with_defaults())
    }
}

impl ItineraryGenerator {
    pub fn new(registry: CatalogRegistry) -> Self {
        Self {
            registry,
            config: ItineraryGenerationConfig::default(),
        }
    }

    pub fn with_config(registry: CatalogRegistry, config: ItineraryGenerationConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &ItineraryGenerationConfig {
        &self.config
    }

    pub fn extract(&self, prompt: &str) -> ExtractedTrip {
        TripExtractor::new(&self.registry, &self.config).extract(prompt)
    }

    /// Generate a complete trip for `prompt`, starting on `today`.
    pub fn synthesize_trip(
        &self,
        prompt: &str,
        today: NaiveDate,
        rng: &mut dyn RandomSource,
    ) -> TripPlan {
        let request = self.extract(prompt);
        let catalog = self.registry.resolve(&request.destination);
        let days = DayScheduler::new(&catalog, &request.destination).schedule(request.days, rng);
        let estimated_cost = PricingService::calculate_estimated_cost(&days);

        log::info!(
            "Synthesised {}-day trip to {} ({} catalog), estimated cost ${}",
            request.days,
            request.destination,
            catalog.key.as_deref().unwrap_or("generic"),
            estimated_cost
        );

        assemble(
            &request.destination,
            request.days,
            request.budget,
            days,
            estimated_cost,
            today,
        )
    }
}

/// Package a schedule into a fresh [`Trip`] with no expenses, plus the
/// human-readable summary.
pub fn assemble(
    destination: &str,
    day_count: u32,
    budget: f64,
    days: Vec<TripDay>,
    estimated_cost: f64,
    today: NaiveDate,
) -> TripPlan {
    let start_date = today;
    let end_date = start_date + Duration::days(i64::from(day_count.saturating_sub(1)));

    let trip = Trip {
        id: Uuid::new_v4().to_string(),
        destination: destination.to_string(),
        start_date,
        end_date,
        budget,
        days,
        expenses: Vec::new(),
        total_expenses: 0.0,
    };

    let summary = format!(
        "Here's your {}-day trip to {} with a budget of ${}. I've included various attractions, \
         restaurants, and transportation options. The estimated total cost is ${}. \
         You can view and edit the detailed itinerary below.",
        day_count, trip.destination, budget, estimated_cost
    );

    TripPlan { trip, summary }
}
