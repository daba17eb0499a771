//! Turn-request processing — the gateway's sequencing of one inbound
//! operator message: progress notice, AI reply, optional mirror, and
//! directive dispatch with an outcome notice.

use netrelay_agent::prompt;
use netrelay_channels::directive::{self, DirectiveScan};
use netrelay_channels::dispatch::DispatchOutcome;
use netrelay_core::types::{ChatTurn, Sender};
use netrelay_protocol::frames::{turn_json, SystemNotice, TurnRequest};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

use crate::app::AppState;

/// Process one turn request to completion, emitting protocol messages to
/// the originating connection only.
pub async fn process(state: Arc<AppState>, request: TurnRequest, out: mpsc::Sender<String>) {
    // 1. Immediate progress notice.
    emit(&out, SystemNotice::thinking().to_json()).await;

    // 2. Format the conversation and obtain the reply text. The frontend
    // appends the triggering operator turn to chatHistory before sending;
    // when the history arrives empty, fall back to the raw text field.
    let (system, turns) = if request.chat_history.is_empty() {
        let trigger = ChatTurn::new(Sender::User, request.text.clone());
        prompt::build_request(&[trigger], &request.devices, &request.network_config)
    } else {
        prompt::build_request(
            &request.chat_history,
            &request.devices,
            &request.network_config,
        )
    };
    let reply = state.ai.generate(&system, &turns).await;

    // 3. Emit the assistant turn.
    let assistant = ChatTurn::assistant(reply.clone())
        .with_scope(request.network_config.user_id.clone(), None);
    emit(&out, turn_json(&assistant)).await;

    // 4. Mirror plain replies to the Webex space, fire-and-forget.
    let config = &request.network_config;
    if config.can_mirror() && !directive::contains_markup(&reply) {
        let mirror = Arc::clone(&state.mirror);
        let token = config.webex_bot_token.clone().unwrap_or_default();
        let room = config.webex_room_id.clone().unwrap_or_default();
        let message = reply.clone();
        tokio::spawn(async move {
            if let Err(e) = mirror.mirror(&token, &room, &message).await {
                warn!(error = %e, "chat-space mirror failed");
            }
        });
    }

    // 5. Extract and dispatch an embedded directive; report the outcome.
    let notice = match directive::scan(&reply) {
        DirectiveScan::NoDirective => None,
        DirectiveScan::Invalid(reason) => Some(format!("Notification failed: {reason}")),
        DirectiveScan::Parsed(parsed) => state
            .dispatcher
            .dispatch(&parsed, config)
            .await
            .map(|outcome| match outcome {
                DispatchOutcome::Delivered(platform) => {
                    format!("Notification sent to {platform}.")
                }
                DispatchOutcome::Failed(reason) => format!("Notification failed: {reason}"),
            }),
    };
    if let Some(text) = notice {
        emit(&out, SystemNotice::new(text).to_json()).await;
    }
}

async fn emit(out: &mpsc::Sender<String>, payload: String) {
    // Connection gone — nothing left to report to.
    let _ = out.send(payload).await;
}
