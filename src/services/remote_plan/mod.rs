//! Remote Plan Providers
//!
//! Itinerary generation backed by a hosted language model. Every backend
//! turns a prompt into raw model text; extraction of the JSON payload and
//! validation against the trip schema are shared, so a plan from any
//! provider satisfies the same invariants as the offline generator.
//!
//! ## Backends
//! - OpenAI chat completions (`OPENAI_API_KEY`, or an `sk-` key in `AI_API_KEY`)
//! - Google Gemini `generateContent` (`GEMINI_API_KEY`, or an `AIza` key)
//!
//! Any failure (transport, non-2xx status, unparseable or schema-violating
//! payload) surfaces as a [`RemotePlanError`]; callers fall back to local
//! synthesis.

pub mod gemini;
pub mod openai;
pub mod parsing;

use crate::config::RemoteConfig;
use crate::models::trip::TripPlan;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub use parsing::{extract_json_payload, validate_remote_plan, PlanDefaults};

pub const SYSTEM_PROMPT: &str = "You are an expert travel planner. Given a user's prompt, extract destination, trip start date (use today's date unless specified), number of days (as integer), total budget (USD), then generate a detailed day-by-day itinerary with each day's activities in a structured way including: time, title, description, location (city), category (accommodation, attraction, food, transportation, other), and estimated cost (USD). Also, include an English summary. Respond only with a single valid JSON object in this exact format (do not add any extra commentary or text): {trip: Trip, summary: string}, where Trip matches this schema: { id: string, destination: string, startDate: string, endDate: string, budget: number, days: Array<{day: number, activities: Array<{id: string, time: string, title: string, description: string, location: string, cost: number, category: string}>}>, expenses: [], totalExpenses: number }.";

#[derive(Debug, thiserror::Error)]
pub enum RemotePlanError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("the model returned an empty response")]
    EmptyResponse,
    #[error("failed to parse model response: {0}")]
    Unparseable(String),
    #[error("trip data is incomplete: {0}")]
    InvalidPlan(String),
}

impl RemotePlanError {
    pub fn status(&self) -> Option<u16> {
        match self {
            RemotePlanError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
}

impl ProviderKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "openai" | "chatgpt" => Some(ProviderKind::OpenAi),
            "gemini" | "google" => Some(ProviderKind::Gemini),
            _ => None,
        }
    }

    /// Guess the provider from the shape of an API key.
    pub fn detect_from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        if key.starts_with("sk-") {
            Some(ProviderKind::OpenAi)
        } else if key.starts_with("AIza") {
            Some(ProviderKind::Gemini)
        } else {
            None
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "https://api.openai.com",
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-3.5-turbo",
            ProviderKind::Gemini => "gemini-1.0-pro",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::OpenAi => f.write_str("openai"),
            ProviderKind::Gemini => f.write_str("gemini"),
        }
    }
}

#[async_trait]
pub trait RemotePlanProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Send the planning prompt and return the model's raw reply text.
    async fn request_completion(&self, prompt: &str) -> Result<String, RemotePlanError>;
}

/// Ask `provider` for a plan and accept it only if it passes validation.
pub async fn fetch_remote_plan(
    provider: &dyn RemotePlanProvider,
    prompt: &str,
    defaults: &PlanDefaults,
) -> Result<TripPlan, RemotePlanError> {
    let content = provider.request_completion(prompt).await?;
    if content.trim().is_empty() {
        return Err(RemotePlanError::EmptyResponse);
    }

    let payload = extract_json_payload(&content);
    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| RemotePlanError::Unparseable(e.to_string()))?;

    validate_remote_plan(value, defaults)
}

pub(crate) fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client, RemotePlanError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .build()?)
}

/// Build the configured backend, or `None` when no usable API key is set.
pub fn build_provider(
    config: &RemoteConfig,
) -> Result<Option<Arc<dyn RemotePlanProvider>>, RemotePlanError> {
    let (Some(kind), Some(_)) = (config.provider, config.api_key.as_deref()) else {
        return Ok(None);
    };

    let provider: Arc<dyn RemotePlanProvider> = match kind {
        ProviderKind::OpenAi => Arc::new(openai::OpenAiProvider::new(config)?),
        ProviderKind::Gemini => Arc::new(gemini::GeminiProvider::new(config)?),
    };

    log::info!(
        "Remote plan provider '{}' enabled (model {})",
        provider.name(),
        config.model_or(kind)
    );
    Ok(Some(provider))
}
