use thiserror::Error;

/// Failures while decoding the inbound notification. These abort the
/// invocation before any delivery attempt.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl NotifyError {
    pub fn malformed(detail: impl Into<String>) -> Self {
        NotifyError::MalformedPayload(detail.into())
    }
}

/// Failures while posting to the webhook. These are logged at the handler
/// boundary and swallowed; delivery is never retried.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("request failed: {status} {reason}")]
    Status { status: u16, reason: String },
    #[error("server connection failed: {0}")]
    Connection(#[from] reqwest::Error),
    #[error("serializing post data failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
