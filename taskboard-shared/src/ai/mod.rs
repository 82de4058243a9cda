/// Task description generation
///
/// Handlers depend only on [`DescriptionGenerator`]; the concrete provider
/// is [`OpenAiGenerator`], which talks to any OpenAI-compatible chat
/// completions endpoint. The API runs without a generator when no provider
/// key is configured.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::ai::{DescriptionGenerator, OpenAiConfig, OpenAiGenerator};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let generator = OpenAiGenerator::new(OpenAiConfig::new("sk-..."))?;
///
/// let description = generator.generate("Design homepage mockup").await?;
/// println!("{}", description);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;

pub mod openai;

pub use openai::{OpenAiConfig, OpenAiGenerator};

/// Error type for description generation
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// Request could not be sent or the response could not be read
    #[error("AI provider request failed: {0}")]
    Request(String),

    /// Provider answered with a non-success status
    #[error("AI provider returned status {status}: {body}")]
    Provider { status: u16, body: String },

    /// Provider answered 2xx without any generated text
    #[error("AI provider returned no content")]
    EmptyResponse,

    /// Client could not be constructed
    #[error("AI provider configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        AiError::Request(err.to_string())
    }
}

/// Produces a task description from a task title
#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    async fn generate(&self, title: &str) -> Result<String, AiError>;
}
