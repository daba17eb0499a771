use tracing::{info, warn};

use crate::provider::{ChatMessage, TextProvider};

/// Fixed user-facing reply when the provider fails for any reason.
pub const FALLBACK_REPLY: &str =
    "There was an issue communicating with the AI. Please try again.";

/// Wraps the text provider and absorbs every failure into ordinary reply
/// text. The turn pipeline always gets a string back; a provider outage
/// degrades to a textual apology instead of an error path.
pub struct ResponseClient {
    provider: Box<dyn TextProvider>,
}

impl ResponseClient {
    pub fn new(provider: Box<dyn TextProvider>) -> Self {
        Self { provider }
    }

    /// Issue one generate call. Never fails visibly to the caller.
    pub async fn generate(&self, system_instruction: &str, turns: &[ChatMessage]) -> String {
        info!(provider = %self.provider.name(), turns = turns.len(), "requesting AI reply");
        match self.provider.generate(system_instruction, turns).await {
            Ok(text) => text,
            Err(e) => {
                warn!(provider = %self.provider.name(), error = %e, "provider call failed");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}
