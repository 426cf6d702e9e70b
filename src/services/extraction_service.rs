//! Lexical extraction of trip parameters from a free-text prompt.
//!
//! Never fails: anything that cannot be recognised falls back to the
//! configured defaults.

use crate::services::catalog_service::{display_name, normalize_destination, CatalogRegistry};
use crate::services::itinerary_generation_service::ItineraryGenerationConfig;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Capitalised words that describe the trip rather than name a place.
const GENERIC_TRIP_WORDS: &[&str] = &[
    "trip", "weekend", "day", "days", "family", "couple", "budget", "romantic",
    // sentence openers
    "i", "i'm", "im", "plan", "planning", "please", "help", "want", "looking", "going",
    "create", "make", "need", "a", "an", "the", "my", "our", "we",
];

/// Words that end a place name captured after a preposition.
const QUALIFIER_WORDS: &[&str] = &[
    "with", "for", "on", "in", "at", "to", "and", "during", "from", "next", "this", "budget",
    "focus", "focusing", "including", "around", "under", "over", "about", "using", "by",
    "trip", "vacation", "holiday", "weekend", "day", "days", "week", "weeks", "please",
];

/// Words that cannot start a place name.
const FILLER_WORDS: &[&str] = &["a", "an", "the", "my", "our", "your", "some", "two", "me", "us"];

/// Verbs and activities that can sit between a preposition and the place,
/// as in "to visit Lisbon" or "in hiking in Patagonia".
const LEADING_VERBS: &[&str] = &[
    "visit", "visiting", "go", "going", "see", "seeing", "explore", "exploring", "travel",
    "traveling", "travelling", "fly", "flying", "head", "heading", "hike", "hiking", "tour",
    "touring", "discover", "experience", "spend", "stay", "staying", "relax", "relaxing",
    "check", "out", "drive", "driving", "backpack", "backpacking", "ski", "skiing", "surf",
    "surfing", "eat", "eating", "get", "escape",
];

const PREPOSITIONS: &[&str] = &["trip to", "in", "to", "for", "at"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedTrip {
    /// Title-cased destination, e.g. `"New York"`.
    pub destination: String,
    pub days: u32,
    pub budget: f64,
}

fn days_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\b(\d+)\s*-?\s*days?\b").expect("valid days regex"))
}

fn budget_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$(\d+)").expect("valid budget regex"))
}

fn preposition_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        PREPOSITIONS
            .iter()
            .map(|preposition| {
                let pattern = format!(r"(?i)\b{}\s+", regex::escape(preposition).replace(' ', r"\s+"));
                Regex::new(&pattern).expect("valid preposition regex")
            })
            .collect()
    })
}

fn capitalized_run_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\b[A-Z][A-Za-z'\-]*(?:\s+[A-Z][A-Za-z'\-]*)*").expect("valid capitalized regex")
    })
}

pub struct TripExtractor<'a> {
    registry: &'a CatalogRegistry,
    config: &'a ItineraryGenerationConfig,
}

impl<'a> TripExtractor<'a> {
    pub fn new(registry: &'a CatalogRegistry, config: &'a ItineraryGenerationConfig) -> Self {
        Self { registry, config }
    }

    pub fn extract(&self, prompt: &str) -> ExtractedTrip {
        let destination = self.extract_destination(prompt);
        let days = self.extract_days(prompt);
        let budget = self.extract_budget(prompt);

        log::debug!(
            "Extracted destination='{}' days={} budget={} from prompt",
            destination,
            days,
            budget
        );

        ExtractedTrip {
            destination,
            days,
            budget,
        }
    }

    pub fn extract_destination(&self, prompt: &str) -> String {
        if let Some(key) = self.find_known_destination(prompt) {
            return display_name(&key);
        }

        if let Some(span) = preposition_span(prompt) {
            return display_name(&span);
        }

        if let Some(run) = first_capitalized_run(prompt) {
            return display_name(&run);
        }

        display_name(&self.config.fallback_destination)
    }

    /// Earliest registry key mentioned in the prompt; longer keys win ties.
    fn find_known_destination(&self, prompt: &str) -> Option<String> {
        let haystack = normalize_destination(prompt);
        self.registry
            .known_destinations()
            .filter_map(|key| find_word(&haystack, key).map(|position| (position, key)))
            .min_by(|(pos_a, key_a), (pos_b, key_b)| {
                pos_a.cmp(pos_b).then_with(|| key_b.len().cmp(&key_a.len()))
            })
            .map(|(_, key)| key.to_string())
    }

    pub fn extract_days(&self, prompt: &str) -> u32 {
        let max_days = self.config.max_trip_days.max(1);
        days_pattern()
            .captures(prompt)
            .and_then(|caps| caps[1].parse::<u32>().ok())
            .map(|days| days.clamp(1, max_days))
            .unwrap_or_else(|| self.config.default_days.clamp(1, max_days))
    }

    pub fn extract_budget(&self, prompt: &str) -> f64 {
        budget_pattern()
            .captures(prompt)
            .and_then(|caps| caps[1].parse::<u64>().ok())
            .filter(|budget| *budget > 0)
            .map(|budget| budget as f64)
            .unwrap_or(self.config.default_budget)
    }
}

/// Byte offset of the first whole-word occurrence of `needle`.
fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    haystack.match_indices(needle).map(|(start, _)| start).find(|&start| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Place name following one of the prepositions, with qualifiers and digits cut off.
fn preposition_span(prompt: &str) -> Option<String> {
    for re in preposition_patterns() {
        for found in re.find_iter(prompt) {
            let rest = &prompt[found.end()..];
            if let Some(span) = place_words(rest) {
                return Some(span);
            }
        }
    }

    None
}

fn place_words(text: &str) -> Option<String> {
    let clause = text
        .split(|c: char| matches!(c, ',' | '.' | ';' | '!' | '?' | '(' | ')' | '\n'))
        .next()
        .unwrap_or("");

    let mut words = Vec::new();
    let candidates = clause
        .split_whitespace()
        .skip_while(|word| LEADING_VERBS.contains(&word.to_lowercase().as_str()));
    for word in candidates {
        let lower = word.to_lowercase();
        if word.chars().any(|c| c.is_ascii_digit())
            || word.starts_with('$')
            || QUALIFIER_WORDS.contains(&lower.as_str())
        {
            break;
        }
        words.push(word);
    }

    let first = words.first()?.to_lowercase();
    let looks_like_name = first
        .chars()
        .all(|c| c.is_alphabetic() || c == '-' || c == '\'');
    if FILLER_WORDS.contains(&first.as_str()) || !looks_like_name {
        return None;
    }

    Some(words.join(" "))
}

fn first_capitalized_run(prompt: &str) -> Option<String> {
    capitalized_run_pattern().find_iter(prompt).find_map(|run| {
        let words: Vec<&str> = run
            .as_str()
            .split_whitespace()
            .filter(|word| !GENERIC_TRIP_WORDS.contains(&word.to_lowercase().as_str()))
            .collect();

        if words.is_empty() {
            None
        } else {
            Some(words.join(" "))
        }
    })
}
