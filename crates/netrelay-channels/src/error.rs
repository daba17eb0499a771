use thiserror::Error;

/// Errors from outbound channel calls (mirror, webhooks).
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{channel} returned status {status}")]
    Status { channel: String, status: u16 },
}
