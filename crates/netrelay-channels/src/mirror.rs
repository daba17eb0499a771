//! Best-effort mirroring of assistant replies into the Webex space.
//!
//! Not part of the turn's success/failure contract: the caller spawns
//! `mirror` as a fire-and-forget task and only logs the result.

use tracing::{debug, warn};

use crate::error::ChannelError;

const DEFAULT_BASE_URL: &str = "https://webexapis.com";

pub struct Mirror {
    client: reqwest::Client,
    base_url: String,
}

impl Mirror {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// POST a markdown message to the Webex message-creation endpoint.
    pub async fn mirror(
        &self,
        bot_token: &str,
        room_id: &str,
        message: &str,
    ) -> Result<(), ChannelError> {
        let url = format!("{}/v1/messages", self.base_url);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(bot_token)
            .json(&serde_json::json!({ "roomId": room_id, "markdown": message }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            warn!(status, "Webex mirror rejected the message");
            return Err(ChannelError::Status {
                channel: "webex".to_string(),
                status,
            });
        }

        debug!(room_id, "reply mirrored to Webex space");
        Ok(())
    }
}

impl Default for Mirror {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn mirror_posts_authenticated_markdown() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("authorization", "Bearer bot-token"))
            .and(body_json(
                serde_json::json!({ "roomId": "room-1", "markdown": "hello" }),
            ))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mirror = Mirror::with_base_url(server.uri());
        mirror.mirror("bot-token", "room-1", "hello").await.unwrap();
    }

    #[tokio::test]
    async fn mirror_surfaces_rejection_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let mirror = Mirror::with_base_url(server.uri());
        let err = mirror.mirror("bad", "room-1", "hello").await.unwrap_err();
        assert!(matches!(err, ChannelError::Status { status: 401, .. }));
    }
}
