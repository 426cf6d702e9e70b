//! Destination catalogs
//!
//! Curated lists of named, costed, categorised activities per destination,
//! plus a generic catalog synthesised for places the registry does not know.

use crate::models::activity::{ActivityCategory, CatalogEntry};
use std::collections::BTreeMap;

use ActivityCategory::{Accommodation, Attraction, Food, Transportation};

const LONDON: &[(&str, ActivityCategory, f64)] = &[
    ("British Museum", Attraction, 0.0),
    ("Tower of London", Attraction, 30.0),
    ("London Eye", Attraction, 25.0),
    ("Buckingham Palace", Attraction, 30.0),
    ("St. Paul's Cathedral", Attraction, 20.0),
    ("Covent Garden", Attraction, 0.0),
    ("Camden Market", Attraction, 0.0),
    ("The Shard", Attraction, 30.0),
    ("Dishoom", Food, 25.0),
    ("Flat Iron", Food, 20.0),
    ("Afternoon Tea at Fortnum & Mason", Food, 50.0),
    ("Borough Market", Food, 15.0),
    ("The Ritz", Accommodation, 300.0),
    ("Premier Inn", Accommodation, 100.0),
    ("Tube Day Pass", Transportation, 15.0),
];

const PARIS: &[(&str, ActivityCategory, f64)] = &[
    ("Eiffel Tower", Attraction, 25.0),
    ("Louvre Museum", Attraction, 20.0),
    ("Notre-Dame Cathedral", Attraction, 0.0),
    ("Arc de Triomphe", Attraction, 12.0),
    ("Montmartre", Attraction, 0.0),
    ("Seine River Cruise", Attraction, 15.0),
    ("Café de Flore", Food, 20.0),
    ("Le Jules Verne", Food, 150.0),
    ("Croissant at Local Bakery", Food, 3.0),
    ("Hotel Plaza Athénée", Accommodation, 500.0),
    ("Ibis Budget Hotel", Accommodation, 80.0),
    ("Metro Day Pass", Transportation, 12.0),
];

const TOKYO: &[(&str, ActivityCategory, f64)] = &[
    ("Tokyo Skytree", Attraction, 20.0),
    ("Senso-ji Temple", Attraction, 0.0),
    ("Meiji Shrine", Attraction, 0.0),
    ("Shibuya Crossing", Attraction, 0.0),
    ("Shinjuku Gyoen", Attraction, 5.0),
    ("Tokyo Disneyland", Attraction, 75.0),
    ("Sushi at Tsukiji Market", Food, 30.0),
    ("Ramen at Ichiran", Food, 15.0),
    ("Robot Restaurant Show", Food, 80.0),
    ("Park Hyatt Tokyo", Accommodation, 350.0),
    ("APA Hotel", Accommodation, 70.0),
    ("Tokyo Metro Day Pass", Transportation, 10.0),
];

const NEW_YORK: &[(&str, ActivityCategory, f64)] = &[
    ("Statue of Liberty", Attraction, 20.0),
    ("Empire State Building", Attraction, 45.0),
    ("Central Park", Attraction, 0.0),
    ("Metropolitan Museum of Art", Attraction, 25.0),
    ("Broadway Show", Attraction, 100.0),
    ("Times Square", Attraction, 0.0),
    ("Katz's Delicatessen", Food, 20.0),
    ("Shake Shack", Food, 15.0),
    ("The Plaza Hotel", Accommodation, 400.0),
    ("Pod 51 Hotel", Accommodation, 120.0),
    ("Subway Day Pass", Transportation, 10.0),
];

/// Lower-cases, trims and collapses inner whitespace.
pub fn normalize_destination(name: &str) -> String {
    name.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalises the first letter of every word: `"new york"` -> `"New York"`.
pub fn display_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Generic catalog for an unrecognised destination: every category is covered.
pub fn generic_catalog(destination: &str) -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new(format!("{} City Tour", destination), Attraction, 25.0),
        CatalogEntry::new(format!("{} Historic Old Town", destination), Attraction, 0.0),
        CatalogEntry::new(format!("Local Restaurant in {}", destination), Food, 25.0),
        CatalogEntry::new(format!("{} Street Food Market", destination), Food, 15.0),
        CatalogEntry::new(format!("{} Grand Hotel", destination), Accommodation, 200.0),
        CatalogEntry::new(format!("{} Budget Inn", destination), Accommodation, 80.0),
        CatalogEntry::new(format!("{} Public Transit Pass", destination), Transportation, 10.0),
        CatalogEntry::new(format!("{} Museum of History", destination), Attraction, 15.0),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCatalog {
    /// Registry key that matched, `None` when the catalog was synthesised.
    pub key: Option<String>,
    pub entries: Vec<CatalogEntry>,
}

impl ResolvedCatalog {
    pub fn is_generic(&self) -> bool {
        self.key.is_none()
    }

    pub fn entries_in(&self, category: ActivityCategory) -> Vec<CatalogEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.category == category)
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatalogRegistry {
    catalogs: BTreeMap<String, Vec<CatalogEntry>>,
}

impl CatalogRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the curated London, Paris, Tokyo and New York catalogs.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (name, rows) in [
            ("london", LONDON),
            ("paris", PARIS),
            ("tokyo", TOKYO),
            ("new york", NEW_YORK),
        ] {
            let entries = rows
                .iter()
                .map(|(title, category, cost)| CatalogEntry::new(*title, *category, *cost))
                .collect();
            registry.register(name, entries);
        }
        registry
    }

    pub fn register(&mut self, name: &str, entries: Vec<CatalogEntry>) {
        let key = normalize_destination(name);
        if key.is_empty() {
            return;
        }
        self.catalogs.insert(key, entries);
    }

    pub fn known_destinations(&self) -> impl Iterator<Item = &str> {
        self.catalogs.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&[CatalogEntry]> {
        self.catalogs
            .get(&normalize_destination(key))
            .map(Vec::as_slice)
    }

    /// Finds the catalog whose key is contained in `destination`, preferring
    /// the longest key. Falls back to a generic catalog built around the
    /// display form of `destination`.
    pub fn resolve(&self, destination: &str) -> ResolvedCatalog {
        let normalized = normalize_destination(destination);

        let matched = self
            .catalogs
            .iter()
            .filter(|(key, _)| contains_words(&normalized, key))
            .max_by_key(|(key, _)| key.len());

        match matched {
            Some((key, entries)) => ResolvedCatalog {
                key: Some(key.clone()),
                entries: entries.clone(),
            },
            None => {
                log::debug!("No curated catalog for '{}', synthesising one", destination);
                ResolvedCatalog {
                    key: None,
                    entries: generic_catalog(&display_name(destination)),
                }
            }
        }
    }
}

/// Word-boundary aware containment, so "paris" matches "paris france" but not "parisian".
fn contains_words(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(entries: &[CatalogEntry], category: ActivityCategory) -> usize {
        entries.iter().filter(|e| e.category == category).count()
    }

    #[test]
    fn test_curated_catalogs_cover_every_category() {
        let registry = CatalogRegistry::with_defaults();
        for key in ["london", "paris", "tokyo", "new york"] {
            let entries = registry.get(key).unwrap();
            assert!((10..=15).contains(&entries.len()), "{} has {}", key, entries.len());
            for category in [Accommodation, Attraction, Food, Transportation] {
                assert!(count(entries, category) >= 1, "{} lacks {}", key, category);
            }
        }
    }

    #[test]
    fn test_resolve_uses_case_insensitive_containment() {
        let registry = CatalogRegistry::with_defaults();
        let resolved = registry.resolve("  New   YORK City ");
        assert_eq!(resolved.key.as_deref(), Some("new york"));
        assert_eq!(resolved.entries.len(), 11);
    }

    #[test]
    fn test_resolve_does_not_match_inside_words() {
        let registry = CatalogRegistry::with_defaults();
        assert!(registry.resolve("Parisian Suburbs").is_generic());
    }

    #[test]
    fn test_generic_catalog_shape() {
        let registry = CatalogRegistry::with_defaults();
        let resolved = registry.resolve("zanzibar");
        assert!(resolved.is_generic());
        assert_eq!(resolved.entries.len(), 8);
        assert_eq!(count(&resolved.entries, Attraction), 3);
        assert_eq!(count(&resolved.entries, Food), 2);
        assert_eq!(count(&resolved.entries, Accommodation), 2);
        assert_eq!(count(&resolved.entries, Transportation), 1);
        assert!(resolved.entries.iter().all(|e| e.title.contains("Zanzibar")));
    }

    #[test]
    fn test_register_normalizes_key() {
        let mut registry = CatalogRegistry::new();
        registry.register("  Rio  de Janeiro ", generic_catalog("Rio"));
        assert!(registry.get("rio de janeiro").is_some());
        assert_eq!(
            registry.known_destinations().collect::<Vec<_>>(),
            vec!["rio de janeiro"]
        );
    }

    #[test]
    fn test_display_name_title_cases_words() {
        assert_eq!(display_name("new york"), "New York");
        assert_eq!(display_name("zanzibar"), "Zanzibar");
    }
}
