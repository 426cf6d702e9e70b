//! Trip Planner
//!
//! Entry point for turning a prompt into a plan. A configured remote
//! provider is tried first; any failure, or no provider at all, drops to
//! the offline generator with a demo-mode notice. Planning never fails.

use crate::models::trip::TripPlan;
use crate::services::itinerary_generation_service::ItineraryGenerator;
use crate::services::random_source::RandomSource;
use crate::services::remote_plan::{
    fetch_remote_plan, PlanDefaults, RemotePlanError, RemotePlanProvider,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

pub const NO_PROVIDER_NOTICE: &str =
    "Demo mode: no AI provider is configured, so this itinerary was generated offline.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PlanSource {
    Remote { provider: String },
    Local,
}

#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub plan: TripPlan,
    pub source: PlanSource,
    pub notice: Option<String>,
}

impl PlanOutcome {
    pub fn is_demo_mode(&self) -> bool {
        self.source == PlanSource::Local
    }
}

#[derive(Clone)]
pub struct TripPlanner {
    generator: ItineraryGenerator,
    provider: Option<Arc<dyn RemotePlanProvider>>,
}

impl TripPlanner {
    pub fn new(generator: ItineraryGenerator, provider: Option<Arc<dyn RemotePlanProvider>>) -> Self {
        Self {
            generator,
            provider,
        }
    }

    /// Planner that only ever uses the offline generator.
    pub fn offline(generator: ItineraryGenerator) -> Self {
        Self::new(generator, None)
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_deref().map(|p| p.name())
    }

    pub fn generator(&self) -> &ItineraryGenerator {
        &self.generator
    }

    pub async fn plan(&self, prompt: &str, today: NaiveDate) -> PlanOutcome {
        match self.try_remote(prompt, today).await {
            Ok(outcome) => outcome,
            Err(notice) => self.local_outcome(prompt, today, &mut rand::thread_rng(), notice),
        }
    }

    /// Same as [`TripPlanner::plan`] with an explicit random source for the
    /// offline path.
    pub async fn plan_with_rng(
        &self,
        prompt: &str,
        today: NaiveDate,
        rng: &mut dyn RandomSource,
    ) -> PlanOutcome {
        match self.try_remote(prompt, today).await {
            Ok(outcome) => outcome,
            Err(notice) => self.local_outcome(prompt, today, rng, notice),
        }
    }

    /// Remote plan, or the notice to show when falling back.
    async fn try_remote(&self, prompt: &str, today: NaiveDate) -> Result<PlanOutcome, String> {
        let Some(provider) = self.provider.as_deref() else {
            return Err(NO_PROVIDER_NOTICE.to_string());
        };

        let defaults = PlanDefaults {
            today,
            budget: self.generator.extract(prompt).budget,
            max_days: self.generator.config().max_trip_days,
        };

        match fetch_remote_plan(provider, prompt, &defaults).await {
            Ok(plan) => {
                log::info!(
                    "Remote provider '{}' planned {} days in {}",
                    provider.name(),
                    plan.trip.days.len(),
                    plan.trip.destination
                );
                Ok(PlanOutcome {
                    plan,
                    source: PlanSource::Remote {
                        provider: provider.name().to_string(),
                    },
                    notice: None,
                })
            }
            Err(err) => {
                log::warn!(
                    "Remote provider '{}' failed, using offline generator: {}",
                    provider.name(),
                    err
                );
                Err(fallback_notice(&err))
            }
        }
    }

    fn local_outcome(
        &self,
        prompt: &str,
        today: NaiveDate,
        rng: &mut dyn RandomSource,
        notice: String,
    ) -> PlanOutcome {
        PlanOutcome {
            plan: self.generator.synthesize_trip(prompt, today, rng),
            source: PlanSource::Local,
            notice: Some(notice),
        }
    }
}

/// User-facing reason for falling back. Upstream response bodies stay in
/// the log.
fn fallback_notice(err: &RemotePlanError) -> String {
    let reason = match err.status() {
        Some(status) => format!("HTTP {}", status),
        None => err.to_string(),
    };
    format!(
        "Demo mode activated: the AI service is unavailable ({}). \
         This itinerary was generated offline.",
        reason
    )
}
