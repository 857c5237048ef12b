// OpenAiProvider - document summarization via the OpenAI chat completions API

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::prompts;
use super::provider::{
    AnalysisMode, AvailabilityResult, SummaryProvider, SummaryRequest, SummaryResponse,
};
use super::utils::first_non_blank_line;
use crate::error::{AppError, Result};

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Model/endpoint parameters for the chat completions call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Summarization provider backed by the OpenAI chat completions API.
///
/// The API key is not baked into the client: every request carries the
/// credential it was given, so a key change takes effect on the next call.
pub struct OpenAiProvider {
    client: Client,
    config: ProviderConfig,
    url_chat: String,
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let endpoint = config.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(AppError::Validation(format!(
                "Invalid provider endpoint: {}",
                config.endpoint
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::SummarizationFailed(format!("Failed to build HTTP client: {}", e)))?;

        let url_chat = format!("{}/v1/chat/completions", endpoint.trim_end_matches('/'));

        info!(
            model = %config.model,
            endpoint = %config.endpoint,
            timeout_secs = config.timeout_secs,
            "OpenAiProvider initialized"
        );

        Ok(Self {
            client,
            config,
            url_chat,
        })
    }

    /// Single non-streaming chat completion; returns the first non-blank content
    async fn complete(&self, api_key: &str, system: &str, user: &str) -> Result<String> {
        let started = Instant::now();
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!(model = %self.config.model, prompt_len = user.len(), "POST {}", self.url_chat);

        let response = self
            .client
            .post(&self.url_chat)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::SummarizationFailed(format!("OpenAI request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .ok()
                .and_then(|b| b.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| "unknown error".to_string());

            error!(
                status = status.as_u16(),
                %message,
                latency_ms = started.elapsed().as_millis() as u64,
                "OpenAI chat completion returned non-success status"
            );
            return Err(AppError::SummarizationFailed(format!(
                "OpenAI API error: {} - {}",
                status.as_u16(),
                message
            )));
        }

        let out: ChatCompletionResponse = response.json().await.map_err(|e| {
            AppError::SummarizationFailed(format!("Failed to parse OpenAI response: {}", e))
        })?;

        let content = out
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| AppError::SummarizationFailed("empty response from OpenAI".to_string()))?;

        info!(
            model = %self.config.model,
            latency_ms = started.elapsed().as_millis() as u64,
            response_len = content.len(),
            "chat completion completed"
        );

        Ok(content)
    }
}

// ── OpenAI API request/response shapes ──

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

#[async_trait]
impl SummaryProvider for OpenAiProvider {
    async fn check_availability(&self) -> AvailabilityResult {
        AvailabilityResult {
            available: true,
            reason: None,
        }
    }

    async fn summarize(&self, request: SummaryRequest) -> Result<SummaryResponse> {
        if request.api_key.trim().is_empty() {
            return Err(AppError::Validation("API key is required".to_string()));
        }

        let system = prompts::system_prompt(request.mode);
        let user = prompts::user_message(request.mode, &request.filename, &request.text);
        let content = self.complete(&request.api_key, system, &user).await?;

        let preview = match request.mode {
            AnalysisMode::General => String::new(),
            AnalysisMode::Contract => first_non_blank_line(&content),
        };

        Ok(SummaryResponse {
            preview,
            analyse: content,
        })
    }

    async fn explain(&self, sentence: &str, context: &str, api_key: &str) -> Result<String> {
        if api_key.trim().is_empty() {
            return Err(AppError::Validation("API key is required".to_string()));
        }
        let user = prompts::explain_message(sentence, context);
        self.complete(api_key, prompts::EXPLAIN_SYSTEM_PROMPT, &user).await
    }
}
