/// OpenAI-compatible chat completions provider
///
/// Sends one `POST {base_url}/chat/completions` per call with a fixed system
/// prompt and a user prompt built from the task title, and returns the first
/// choice's message content, trimmed. No retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{AiError, DescriptionGenerator};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 200;

const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that generates detailed task descriptions for project management.";

/// Provider settings
#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,

    /// Base URL without trailing `/chat/completions`
    pub base_url: String,

    pub model: String,

    /// Cap on generated tokens
    pub max_tokens: u32,
}

impl OpenAiConfig {
    /// Settings for the public OpenAI API with default model and token cap
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// User prompt for a task title
pub fn user_prompt(title: &str) -> String {
    format!(
        "Generate a detailed description for this task: {}. Keep it under 200 words.",
        title
    )
}

fn build_request<'a>(config: &'a OpenAiConfig, title: &str) -> ChatRequest<'a> {
    ChatRequest {
        model: &config.model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user",
                content: user_prompt(title),
            },
        ],
        max_tokens: config.max_tokens,
    }
}

fn extract_description(response: ChatResponse) -> Result<String, AiError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(AiError::EmptyResponse)
}

/// [`DescriptionGenerator`] backed by an OpenAI-compatible API
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    http: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiGenerator {
    /// Builds a generator with its own HTTP client
    ///
    /// # Errors
    ///
    /// Returns `AiError::Config` if the HTTP client cannot be built.
    pub fn new(config: OpenAiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("taskboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AiError::Config(e.to_string()))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }
}

#[async_trait]
impl DescriptionGenerator for OpenAiGenerator {
    async fn generate(&self, title: &str) -> Result<String, AiError> {
        let request = build_request(&self.config, title);

        tracing::debug!(model = %self.config.model, "Requesting task description");

        let response = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "AI provider rejected request");
            return Err(AiError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        extract_description(parsed)
    }
}
