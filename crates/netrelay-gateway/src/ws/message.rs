use netrelay_protocol::frames::{ClientEnvelope, SystemNotice};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::warn;

use crate::app::AppState;
use crate::ws::turn;

/// Generic error notice for malformed inbound messages. The connection
/// stays open; nothing else happens for that request.
const GENERIC_ERROR: &str = "Sorry, something went wrong while processing your message.";

/// Route one inbound WS text frame.
///
/// Valid turn-requests are spawned as independent tasks: a client that
/// sends the next request before the previous one completes gets
/// concurrent processing, and replies may arrive out of request order.
pub fn handle(conn_id: &str, text: &str, out: &mpsc::Sender<String>, state: &Arc<AppState>) {
    let envelope: ClientEnvelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(conn_id, error = %e, "malformed inbound message");
            send_error_notice(out);
            return;
        }
    };

    let Some(request) = envelope.as_turn_request() else {
        warn!(conn_id, message_type = %envelope.message_type, "unsupported or malformed envelope");
        send_error_notice(out);
        return;
    };

    let state = Arc::clone(state);
    let out = out.clone();
    tokio::spawn(async move {
        turn::process(state, request, out).await;
    });
}

/// Queue the generic error notice. Awaited in a task so a momentarily
/// full outbound queue delays the notice instead of dropping it.
fn send_error_notice(out: &mpsc::Sender<String>) {
    let out = out.clone();
    tokio::spawn(async move {
        let _ = out.send(SystemNotice::new(GENERIC_ERROR).to_json()).await;
    });
}
