//! Day Scheduler
//!
//! Turns a destination catalog into a day-by-day schedule. One accommodation
//! is chosen for the whole stay; attractions and meals are reshuffled every
//! day and placed into fixed time slots.

use crate::models::activity::{Activity, ActivityCategory, CatalogEntry};
use crate::models::trip::TripDay;
use crate::services::catalog_service::ResolvedCatalog;
use crate::services::random_source::{shuffle, RandomSource};
use chrono::NaiveTime;
use uuid::Uuid;

const ATTRACTIONS_PER_DAY: usize = 3;
const MEALS_PER_DAY: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    CheckIn,
    MorningAttraction,
    Lunch,
    AfternoonAttraction,
    EveningAttraction,
    Dinner,
    Transit,
}

impl Slot {
    /// `None` for slots that span the whole day.
    pub fn start_time(&self) -> Option<NaiveTime> {
        let (hour, minute) = match self {
            Slot::CheckIn => (8, 0),
            Slot::MorningAttraction => (10, 0),
            Slot::Lunch => (12, 30),
            Slot::AfternoonAttraction => (14, 0),
            Slot::EveningAttraction => (16, 30),
            Slot::Dinner => (19, 0),
            Slot::Transit => return None,
        };
        NaiveTime::from_hms_opt(hour, minute, 0)
    }

    pub fn label(&self) -> String {
        match self.start_time() {
            Some(time) => time.format("%I:%M %p").to_string(),
            None => "All day".to_string(),
        }
    }

    /// Title and cost used when the catalog cannot fill a mandatory slot.
    fn backfill(&self, destination: &str) -> Option<(String, f64)> {
        match self {
            Slot::CheckIn => Some((format!("Hotel in {}", destination), 0.0)),
            Slot::MorningAttraction => Some((format!("Explore {}", destination), 0.0)),
            Slot::Lunch => Some((format!("Local Lunch Spot in {}", destination), 10.0)),
            Slot::AfternoonAttraction => Some((format!("Afternoon Walk in {}", destination), 0.0)),
            Slot::Dinner => Some((format!("Local Dinner in {}", destination), 20.0)),
            Slot::EveningAttraction | Slot::Transit => None,
        }
    }
}

pub struct DayScheduler<'a> {
    catalog: &'a ResolvedCatalog,
    destination: &'a str,
}

impl<'a> DayScheduler<'a> {
    pub fn new(catalog: &'a ResolvedCatalog, destination: &'a str) -> Self {
        Self {
            catalog,
            destination,
        }
    }

    pub fn schedule(&self, day_count: u32, rng: &mut dyn RandomSource) -> Vec<TripDay> {
        let accommodation = self.pick_accommodation(rng);
        let attractions = self.catalog.entries_in(ActivityCategory::Attraction);
        let meals = self.catalog.entries_in(ActivityCategory::Food);
        let transport = self.catalog.entries_in(ActivityCategory::Transportation);

        (1..=day_count)
            .map(|day| {
                let mut day_attractions = attractions.clone();
                shuffle(&mut day_attractions, rng);
                day_attractions.truncate(ATTRACTIONS_PER_DAY);

                let mut day_meals = meals.clone();
                shuffle(&mut day_meals, rng);
                day_meals.truncate(MEALS_PER_DAY);

                let day_transport = if transport.is_empty() {
                    None
                } else {
                    Some(&transport[rng.next_index(transport.len())])
                };

                TripDay {
                    day,
                    activities: self.build_day(
                        day,
                        &accommodation,
                        &day_attractions,
                        &day_meals,
                        day_transport,
                    ),
                }
            })
            .collect()
    }

    fn pick_accommodation(&self, rng: &mut dyn RandomSource) -> CatalogEntry {
        let options = self.catalog.entries_in(ActivityCategory::Accommodation);
        if options.is_empty() {
            let (title, cost) = Slot::CheckIn
                .backfill(self.destination)
                .unwrap_or_else(|| (self.destination.to_string(), 0.0));
            return CatalogEntry::new(title, ActivityCategory::Accommodation, cost);
        }
        options[rng.next_index(options.len())].clone()
    }

    fn build_day(
        &self,
        day: u32,
        accommodation: &CatalogEntry,
        attractions: &[CatalogEntry],
        meals: &[CatalogEntry],
        transport: Option<&CatalogEntry>,
    ) -> Vec<Activity> {
        let mut activities = vec![self.activity(
            Slot::CheckIn,
            &accommodation.title,
            format!("Your accommodation for day {}", day),
            accommodation.cost,
            ActivityCategory::Accommodation,
        )];

        let placements = [
            (Slot::MorningAttraction, attractions.first(), ActivityCategory::Attraction),
            (Slot::Lunch, meals.first(), ActivityCategory::Food),
            (Slot::AfternoonAttraction, attractions.get(1), ActivityCategory::Attraction),
            (Slot::EveningAttraction, attractions.get(2), ActivityCategory::Attraction),
            (Slot::Dinner, meals.get(1), ActivityCategory::Food),
        ];

        for (slot, entry, category) in placements {
            let (title, cost) = match entry {
                Some(entry) => (entry.title.clone(), entry.cost),
                None => match slot.backfill(self.destination) {
                    Some(fallback) => fallback,
                    None => continue,
                },
            };
            let description = match slot {
                Slot::Lunch => format!("Lunch at {}", title),
                Slot::Dinner => format!("Dinner at {}", title),
                _ => format!("Visit {}", title),
            };
            activities.push(self.activity(slot, &title, description, cost, category));
        }

        if let Some(transport) = transport {
            activities.push(self.activity(
                Slot::Transit,
                &transport.title,
                format!("Transportation for day {}", day),
                transport.cost,
                ActivityCategory::Transportation,
            ));
        }

        activities
    }

    fn activity(
        &self,
        slot: Slot,
        title: &str,
        description: String,
        cost: f64,
        category: ActivityCategory,
    ) -> Activity {
        Activity {
            id: Uuid::new_v4().to_string(),
            time: slot.label(),
            title: title.to_string(),
            description,
            location: self.destination.to_string(),
            cost: cost.max(0.0),
            category,
        }
    }
}
