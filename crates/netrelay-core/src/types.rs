use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Turns whose identifier carries this prefix are canned introductory
/// messages injected by the frontend. They are shown to the user but
/// excluded from the provider-facing history.
pub const INTRO_ID_PREFIX: &str = "intro-";

/// Origin of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The human operator.
    User,
    /// The assistant reply.
    Ai,
    /// Relay-generated notice (progress, dispatch outcome, errors).
    System,
    /// Message ingested from the external Webex space.
    Webex,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Ai => write!(f, "ai"),
            Sender::System => write!(f, "system"),
            Sender::Webex => write!(f, "webex"),
        }
    }
}

/// One exchanged message. Immutable once created; the history a client
/// submits is an append-ordered sequence of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
}

impl ChatTurn {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender,
            text: text.into(),
            timestamp: Utc::now(),
            user_id: None,
            network_id: None,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Ai, text)
    }

    pub fn system_notice(text: impl Into<String>) -> Self {
        Self::new(Sender::System, text)
    }

    pub fn webex(text: impl Into<String>) -> Self {
        Self::new(Sender::Webex, text)
    }

    pub fn with_scope(mut self, user_id: Option<String>, network_id: Option<String>) -> Self {
        self.user_id = user_id;
        self.network_id = network_id;
        self
    }

    /// True for canned introductory turns injected by the frontend.
    pub fn is_intro(&self) -> bool {
        self.id.starts_with(INTRO_ID_PREFIX)
    }
}

/// A managed device from the client's inventory snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub serial: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
}

/// Per-session settings supplied by the client with every turn request.
///
/// Every channel field is independently optional; presence of a field is
/// the sole gate for whether that channel is reachable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_name: Option<String>,
    /// Credential for the managed inventory system. Carried through for
    /// frontend-executed actions; the relay itself never uses it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webex_webhook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webex_bot_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webex_room_id: Option<String>,
}

impl NetworkConfig {
    /// Whether the Webex chat space is reachable for mirroring.
    pub fn can_mirror(&self) -> bool {
        self.webex_bot_token.is_some() && self.webex_room_id.is_some()
    }
}
