//! Action directive extraction from free-form model output.
//!
//! The model embeds a structured request inside natural-language text
//! between literal markers. Extraction is a two-step decode: isolate the
//! substring via delimiter search, then attempt a strict JSON decode.
//! At most one directive is honored per reply; only the first marker
//! pair counts.

use serde::Deserialize;
use serde_json::Value;

pub const OPEN_MARKER: &str = "<execute_action>";
pub const CLOSE_MARKER: &str = "</execute_action>";

/// A parsed action request: an action kind tag plus an untyped payload
/// whose shape depends on the kind. Ephemeral — lives for one turn.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActionDirective {
    pub action: String,
    #[serde(default)]
    pub payload: Value,
}

/// Result of scanning one AI reply.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveScan {
    /// No marker pair present; no action processing for this reply.
    NoDirective,
    /// First marker pair enclosed valid directive JSON.
    Parsed(ActionDirective),
    /// Markup was present but the enclosed payload failed to decode.
    /// Surfaced as a dispatch failure, never silently dropped.
    Invalid(String),
}

/// True when the reply contains directive markup at all. Used to gate
/// the chat-space mirror: replies carrying markup are not mirrored.
pub fn contains_markup(text: &str) -> bool {
    text.contains(OPEN_MARKER)
}

/// Scan `text` for the first opening/closing marker pair and decode the
/// enclosed substring. Subsequent directives in the same reply are
/// ignored by policy — at most one action per turn.
pub fn scan(text: &str) -> DirectiveScan {
    let Some(start) = text.find(OPEN_MARKER) else {
        return DirectiveScan::NoDirective;
    };
    let body_start = start + OPEN_MARKER.len();
    let Some(rel_end) = text[body_start..].find(CLOSE_MARKER) else {
        return DirectiveScan::NoDirective;
    };
    let raw = &text[body_start..body_start + rel_end];

    match serde_json::from_str::<ActionDirective>(raw) {
        Ok(directive) => DirectiveScan::Parsed(directive),
        Err(e) => DirectiveScan::Invalid(format!("malformed action payload: {e}")),
    }
}
