use netrelay_core::types::{ChatTurn, Device, NetworkConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Well-known inbound message type tags.
pub const USER_MESSAGE: &str = "userMessage";

/// Progress notice emitted while the AI call is in flight.
pub const AI_THINKING: &str = "AI_THINKING";

/// Client → Server envelope.
/// Wire: `{ "type": "userMessage", "payload": {...} }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientEnvelope {
    #[serde(rename = "type")]
    pub message_type: String,
    pub payload: Value,
}

impl ClientEnvelope {
    /// Try to interpret this envelope as a turn request.
    /// Returns `None` when the type tag differs or the payload does not
    /// carry the expected fields.
    pub fn as_turn_request(&self) -> Option<TurnRequest> {
        if self.message_type != USER_MESSAGE {
            return None;
        }
        serde_json::from_value(self.payload.clone()).ok()
    }
}

/// The payload accompanying a single turn request: the triggering text,
/// the full ordered history, a device inventory snapshot, and the
/// per-session network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    pub text: String,
    #[serde(default)]
    pub chat_history: Vec<ChatTurn>,
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub network_config: NetworkConfig,
}

/// Server → Client system notice.
/// Wire: `{ "sender": "system", "text": "..." }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemNotice {
    pub sender: String,
    pub text: String,
}

impl SystemNotice {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            sender: "system".to_string(),
            text: text.into(),
        }
    }

    pub fn thinking() -> Self {
        Self::new(AI_THINKING)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Serialize a full chat turn for the wire. Assistant replies and
/// broadcast external turns are sent as-is.
pub fn turn_json(turn: &ChatTurn) -> String {
    serde_json::to_string(turn).unwrap_or_default()
}
