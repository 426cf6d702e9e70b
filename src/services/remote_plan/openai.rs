use super::{build_http_client, ProviderKind, RemotePlanError, RemotePlanProvider, SYSTEM_PROMPT};
use crate::config::RemoteConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatCompletionMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: Option<ChatCompletionContent>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionContent {
    content: Option<String>,
}

pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiProvider {
    pub fn new(config: &RemoteConfig) -> Result<Self, RemotePlanError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| RemotePlanError::Config("OpenAI API key is not set".to_string()))?;

        Ok(Self {
            client: build_http_client(config.timeout_secs)?,
            api_key,
            endpoint: format!(
                "{}/v1/chat/completions",
                config.base_url_or(ProviderKind::OpenAi)
            ),
            model: config.model_or(ProviderKind::OpenAi),
            temperature: config.temperature,
            max_tokens: config.max_output_tokens,
        })
    }
}

#[async_trait]
impl RemotePlanProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn request_completion(&self, prompt: &str) -> Result<String, RemotePlanError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatCompletionMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatCompletionMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        log::debug!("Requesting OpenAI completion from {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

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

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| RemotePlanError::Unparseable(format!("Failed to parse response: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(RemotePlanError::EmptyResponse)
    }
}
