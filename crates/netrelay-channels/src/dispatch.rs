//! Notification dispatch — executes a parsed `send_notification`
//! directive against the webhook configured for the requested platform.
//!
//! One attempt per directive, no retries. Failure is data, not an error:
//! the caller turns the outcome into a system notice for the client.

use netrelay_core::types::NetworkConfig;
use serde::Deserialize;
use std::fmt;
use tracing::{info, warn};

use crate::directive::ActionDirective;

pub const ACTION_SEND_NOTIFICATION: &str = "send_notification";

/// Notification target platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// The Webex chat space (incoming webhook, `{markdown}` body).
    Webex,
    /// The generic notification webhook (`{text}` body).
    Webhook,
}

impl Platform {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "webex" => Some(Platform::Webex),
            "webhook" => Some(Platform::Webhook),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Webex => write!(f, "Webex"),
            Platform::Webhook => write!(f, "Webhook"),
        }
    }
}

/// Outcome of executing one directive.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Delivered(Platform),
    Failed(String),
}

/// Payload shape for `send_notification`.
#[derive(Debug, Deserialize)]
struct NotificationPayload {
    platform: String,
    message: String,
}

pub struct Dispatcher {
    client: reqwest::Client,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Execute a parsed directive. Returns `None` for directive kinds the
    /// dispatcher does not handle (not erroneous — frontend-executed
    /// actions pass through here untouched).
    pub async fn dispatch(
        &self,
        directive: &ActionDirective,
        config: &NetworkConfig,
    ) -> Option<DispatchOutcome> {
        if directive.action != ACTION_SEND_NOTIFICATION {
            return None;
        }

        let payload: NotificationPayload = match serde_json::from_value(directive.payload.clone())
        {
            Ok(p) => p,
            Err(e) => {
                return Some(DispatchOutcome::Failed(format!(
                    "invalid notification payload: {e}"
                )));
            }
        };

        let Some(platform) = Platform::from_tag(&payload.platform) else {
            return Some(DispatchOutcome::Failed(format!(
                "unknown notification platform '{}'",
                payload.platform
            )));
        };

        let url = match platform {
            Platform::Webex => config.webex_webhook_url.as_deref(),
            Platform::Webhook => config.webhook_url.as_deref(),
        };
        let Some(url) = url else {
            // Unresolved channel — report without attempting a network call.
            return Some(DispatchOutcome::Failed(format!(
                "no webhook configured for {platform}"
            )));
        };

        Some(self.post_notification(platform, url, &payload.message).await)
    }

    async fn post_notification(
        &self,
        platform: Platform,
        url: &str,
        message: &str,
    ) -> DispatchOutcome {
        let body = match platform {
            Platform::Webex => serde_json::json!({ "markdown": message }),
            Platform::Webhook => serde_json::json!({ "text": message }),
        };

        match self.client.post(url).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!(%platform, "notification delivered");
                DispatchOutcome::Delivered(platform)
            }
            Ok(resp) => {
                let status = resp.status().as_u16();
                warn!(%platform, status, "notification webhook rejected the request");
                DispatchOutcome::Failed(format!("{platform} webhook returned status {status}"))
            }
            Err(e) => {
                warn!(%platform, error = %e, "notification webhook unreachable");
                DispatchOutcome::Failed(format!("{platform} webhook request failed: {e}"))
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notification_directive(platform: &str, message: &str) -> ActionDirective {
        ActionDirective {
            action: ACTION_SEND_NOTIFICATION.to_string(),
            payload: serde_json::json!({ "platform": platform, "message": message }),
        }
    }

    #[tokio::test]
    async fn unrecognized_action_is_a_no_op() {
        let directive = ActionDirective {
            action: "update_device".to_string(),
            payload: serde_json::json!({ "serial": "Q2XX" }),
        };
        let outcome = Dispatcher::new()
            .dispatch(&directive, &NetworkConfig::default())
            .await;
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn unconfigured_platform_fails_without_network_call() {
        // No mock server at all — a network attempt would error differently.
        let outcome = Dispatcher::new()
            .dispatch(&notification_directive("webex", "hi"), &NetworkConfig::default())
            .await
            .expect("outcome");
        assert_eq!(
            outcome,
            DispatchOutcome::Failed("no webhook configured for Webex".to_string())
        );
    }

    #[tokio::test]
    async fn malformed_payload_yields_failed_outcome() {
        let directive = ActionDirective {
            action: ACTION_SEND_NOTIFICATION.to_string(),
            payload: serde_json::json!({ "platform": "webex" }), // message missing
        };
        let outcome = Dispatcher::new()
            .dispatch(&directive, &NetworkConfig::default())
            .await
            .expect("outcome");
        assert!(matches!(outcome, DispatchOutcome::Failed(ref r) if r.contains("invalid notification payload")));
    }

    #[tokio::test]
    async fn webex_delivery_posts_markdown_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_json(serde_json::json!({ "markdown": "hi" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let config = NetworkConfig {
            webex_webhook_url: Some(format!("{}/hook", server.uri())),
            ..Default::default()
        };
        let outcome = Dispatcher::new()
            .dispatch(&notification_directive("webex", "hi"), &config)
            .await
            .expect("outcome");
        assert_eq!(outcome, DispatchOutcome::Delivered(Platform::Webex));
    }

    #[tokio::test]
    async fn generic_delivery_posts_text_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generic"))
            .and(body_json(serde_json::json!({ "text": "alert" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let config = NetworkConfig {
            webhook_url: Some(format!("{}/generic", server.uri())),
            ..Default::default()
        };
        let outcome = Dispatcher::new()
            .dispatch(&notification_directive("webhook", "alert"), &config)
            .await
            .expect("outcome");
        assert_eq!(outcome, DispatchOutcome::Delivered(Platform::Webhook));
    }

    #[tokio::test]
    async fn non_success_status_reports_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let config = NetworkConfig {
            webex_webhook_url: Some(server.uri()),
            ..Default::default()
        };
        let outcome = Dispatcher::new()
            .dispatch(&notification_directive("webex", "hi"), &config)
            .await
            .expect("outcome");
        assert!(matches!(outcome, DispatchOutcome::Failed(ref r) if r.contains("status 404")));
    }

    #[tokio::test]
    async fn unknown_platform_tag_reports_failure() {
        let outcome = Dispatcher::new()
            .dispatch(&notification_directive("pager", "hi"), &NetworkConfig::default())
            .await
            .expect("outcome");
        assert!(matches!(outcome, DispatchOutcome::Failed(ref r) if r.contains("pager")));
    }
}
