use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Accommodation,
    Attraction,
    Food,
    Transportation,
    Other,
}

impl ActivityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityCategory::Accommodation => "accommodation",
            ActivityCategory::Attraction => "attraction",
            ActivityCategory::Food => "food",
            ActivityCategory::Transportation => "transportation",
            ActivityCategory::Other => "other",
        }
    }

    /// Lenient parse used for model-generated payloads. Anything unrecognised
    /// lands in `Other`.
    pub fn from_loose(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "accommodation" | "accomodation" | "lodging" | "hotel" => {
                ActivityCategory::Accommodation
            }
            "attraction" | "activity" | "sightseeing" => ActivityCategory::Attraction,
            "food" | "meal" | "restaurant" | "dining" => ActivityCategory::Food,
            "transportation" | "transport" | "transit" => ActivityCategory::Transportation,
            _ => ActivityCategory::Other,
        }
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduled entry in a trip day. Never mutated after scheduling.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub time: String,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub cost: f64,
    pub category: ActivityCategory,
}

/// A candidate activity in a destination catalog, before it is placed in a slot.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CatalogEntry {
    pub title: String,
    pub category: ActivityCategory,
    pub cost: f64,
}

impl CatalogEntry {
    pub fn new(title: impl Into<String>, category: ActivityCategory, cost: f64) -> Self {
        Self {
            title: title.into(),
            category,
            cost: cost.max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&ActivityCategory::Transportation).unwrap();
        assert_eq!(json, "\"transportation\"");
    }

    #[test]
    fn test_from_loose_maps_unknown_to_other() {
        assert_eq!(ActivityCategory::from_loose("Hotel"), ActivityCategory::Accommodation);
        assert_eq!(ActivityCategory::from_loose(" FOOD "), ActivityCategory::Food);
        assert_eq!(ActivityCategory::from_loose("shopping"), ActivityCategory::Other);
    }

    #[test]
    fn test_catalog_entry_clamps_negative_cost() {
        let entry = CatalogEntry::new("Free Walk", ActivityCategory::Attraction, -5.0);
        assert_eq!(entry.cost, 0.0);
    }
}
