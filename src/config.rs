use crate::db::session_store::DEFAULT_MAX_SESSIONS;
use crate::services::itinerary_generation_service::ItineraryGenerationConfig;
use crate::services::remote_plan::ProviderKind;
use std::env;
use url::Url;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const DEFAULT_TEMPERATURE: f32 = 0.4;
const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1800;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown AI_PROVIDER '{0}' (expected openai, gemini or none)")]
    UnknownProvider(String),
    #[error("AI_BASE_URL '{0}' is not a valid http(s) URL")]
    InvalidBaseUrl(String),
}

/// Settings for the hosted model backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteConfig {
    pub provider: Option<ProviderKind>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            provider: None,
            api_key: None,
            model: None,
            base_url: None,
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RemoteConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let (provider, api_key) = match get("AI_PROVIDER") {
            Some(name) if name.eq_ignore_ascii_case("none") => (None, None),
            Some(name) => {
                let kind = ProviderKind::parse(&name).ok_or(ConfigError::UnknownProvider(name))?;
                let key = match kind {
                    ProviderKind::OpenAi => get("OPENAI_API_KEY"),
                    ProviderKind::Gemini => get("GEMINI_API_KEY"),
                }
                .or_else(|| get("AI_API_KEY"));
                (Some(kind), key)
            }
            None => {
                if let Some(key) = get("OPENAI_API_KEY") {
                    (Some(ProviderKind::OpenAi), Some(key))
                } else if let Some(key) = get("GEMINI_API_KEY") {
                    (Some(ProviderKind::Gemini), Some(key))
                } else {
                    match get("AI_API_KEY") {
                        Some(key) => (ProviderKind::detect_from_key(&key), Some(key)),
                        None => (None, None),
                    }
                }
            }
        };

        let base_url = match get("AI_BASE_URL") {
            Some(raw) => Some(validate_base_url(&raw)?),
            None => None,
        };

        let defaults = Self::default();
        Ok(Self {
            provider,
            api_key,
            model: get("AI_MODEL"),
            base_url,
            temperature: get("AI_TEMPERATURE")
                .and_then(|s| s.parse().ok())
                .filter(|t: &f32| (0.0..=2.0).contains(t))
                .unwrap_or(defaults.temperature),
            max_output_tokens: get("AI_MAX_OUTPUT_TOKENS")
                .and_then(|s| s.parse().ok())
                .filter(|n: &u32| *n > 0)
                .unwrap_or(defaults.max_output_tokens),
            timeout_secs: get("AI_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .filter(|n: &u64| *n > 0)
                .unwrap_or(defaults.timeout_secs),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some() && self.api_key.is_some()
    }

    pub fn model_or(&self, kind: ProviderKind) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| kind.default_model().to_string())
    }

    /// Base URL without a trailing slash.
    pub fn base_url_or(&self, kind: ProviderKind) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(kind.default_base_url())
            .trim_end_matches('/')
            .to_string()
    }

    /// Key suitable for logs, e.g. `sk-a***wxyz`.
    pub fn masked_key(&self) -> Option<String> {
        self.api_key.as_deref().map(mask_key)
    }
}

fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
            Ok(raw.trim_end_matches('/').to_string())
        }
        _ => Err(ConfigError::InvalidBaseUrl(raw.to_string())),
    }
}

pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}***{}", head, tail)
    } else {
        "***".to_string()
    }
}

/// Everything the server reads from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub max_sessions: usize,
    pub remote: RemoteConfig,
    pub generation: ItineraryGenerationConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| HOST.to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(PORT),
            max_sessions: env::var("MAX_SESSIONS")
                .ok()
                .and_then(|n| n.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(DEFAULT_MAX_SESSIONS),
            remote: RemoteConfig::from_env()?,
            generation: ItineraryGenerationConfig::from_env(),
        })
    }
}
