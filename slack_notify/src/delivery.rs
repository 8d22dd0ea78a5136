use crate::error::DeliveryError;
use crate::slack::Message;
use tracing::debug;

/// Posts the payload to the webhook once. No retry; callers decide what a
/// failure means.
pub async fn post(
    client: &reqwest::Client,
    hook_url: &str,
    message: &Message,
) -> Result<(), DeliveryError> {
    let post_data = serde_json::to_string_pretty(message)?;
    debug!("post data:\n{}", post_data);
    let response = client.post(hook_url).json(message).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(DeliveryError::Status {
            status: status.as_u16(),
            reason: String::from(status.canonical_reason().unwrap_or("unknown")),
        });
    }
    Ok(())
}
