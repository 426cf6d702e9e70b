use super::{build_http_client, ProviderKind, RemotePlanError, RemotePlanProvider, SYSTEM_PROMPT};
use crate::config::RemoteConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

pub struct GeminiProvider {
    client: Client,
    api_key: String,
    endpoint: String,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiProvider {
    pub fn new(config: &RemoteConfig) -> Result<Self, RemotePlanError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| RemotePlanError::Config("Gemini API key is not set".to_string()))?;

        Ok(Self {
            client: build_http_client(config.timeout_secs)?,
            api_key,
            endpoint: format!(
                "{}/v1/models/{}:generateContent",
                config.base_url_or(ProviderKind::Gemini),
                config.model_or(ProviderKind::Gemini)
            ),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }
}

#[async_trait]
impl RemotePlanProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn request_completion(&self, prompt: &str) -> Result<String, RemotePlanError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: SYSTEM_PROMPT }, RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        log::debug!("Requesting Gemini completion from {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            // reqwest errors carry the URL, which includes the key
            .map_err(|e| RemotePlanError::Transport(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RemotePlanError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let generated: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| RemotePlanError::Unparseable(format!("Failed to parse response: {}", e.without_url())))?;

        generated
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(RemotePlanError::EmptyResponse)
    }
}
