//! Webhook ingress endpoint — POST /webhooks/webex.
//!
//! Accepts Webex event payloads and broadcasts them to every live WS
//! connection as an external-channel chat turn. The upstream provider
//! expects delivery acknowledgment regardless of application-level
//! validity, so this route answers 200 even for payloads it ignores.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use netrelay_core::types::ChatTurn;
use netrelay_protocol::frames::turn_json;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::app::AppState;

/// Placeholder body when the event carries no extractable text.
const PLACEHOLDER_TEXT: &str = "New message received in the Webex space.";

/// POST /webhooks/webex
///
/// The body is taken raw and parsed leniently: a body that is not even
/// JSON still gets the fixed success acknowledgment.
pub async fn webex_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    match serde_json::from_slice::<Value>(&body) {
        Ok(payload) => {
            if let Some(turn) = ingest(&payload, &state.config.ingress.domain) {
                info!(turn_id = %turn.id, "broadcasting Webex event to live connections");
                state.registry.broadcast(&turn_json(&turn));
            }
        }
        Err(e) => {
            warn!(error = %e, "webhook body is not valid JSON, ignoring");
        }
    }
    (StatusCode::OK, Json(json!({ "ok": true })))
}

/// Validate and reshape one event payload into an external-channel turn.
/// Returns `None` for payloads that must be ignored (structurally
/// invalid, or sent by the bot's own identity).
fn ingest(payload: &Value, bot_domain: &str) -> Option<ChatTurn> {
    let Some(sender) = payload["data"]["personEmail"].as_str() else {
        warn!("webhook event without sender identity, ignoring");
        return None;
    };

    // Loop prevention — never re-ingest the bot's own outbound messages.
    if sender.ends_with(bot_domain) {
        debug!(sender, "ignoring event from the bot's own identity");
        return None;
    }

    // Best-effort text extraction across known payload shapes.
    let text = payload["data"]["text"]
        .as_str()
        .or_else(|| payload["text"].as_str())
        .unwrap_or(PLACEHOLDER_TEXT);

    let mut turn = ChatTurn::webex(text);
    if let Some(id) = payload["data"]["id"].as_str() {
        turn.id = id.to_string();
    }
    if let Some(created) = payload["data"]["created"]
        .as_str()
        .and_then(|s| s.parse::<DateTime<Utc>>().ok())
    {
        turn.timestamp = created;
    }
    Some(turn)
}
