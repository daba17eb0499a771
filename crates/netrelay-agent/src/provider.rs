use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single message in the provider-facing conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Provider-facing conversation roles. The operator maps to `user`,
/// the assistant to `model`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response parse error: {0}")]
    Parse(String),

    #[error("Provider returned no candidates")]
    Empty,
}

/// Common interface for text-generation providers.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Provider name for logging and error messages.
    fn name(&self) -> &str;

    /// Issue one generate call with a system instruction and ordered turns,
    /// wait for the full generated text.
    async fn generate(
        &self,
        system_instruction: &str,
        turns: &[ChatMessage],
    ) -> Result<String, ProviderError>;
}
