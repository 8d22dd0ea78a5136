pub mod config;
pub mod delivery;
pub mod error;
pub mod notification;
pub mod slack;

use aws_lambda_events::event::sns::SnsEvent;
use config::Config;
use error::{DeliveryError, NotifyError};
use lambda_runtime::{Error, LambdaEvent};
use notification::Notification;
use tracing::{debug, error, info, warn};

/// Turns one SNS record into a Slack message and posts it. A malformed
/// payload aborts the invocation; an unsupported notification or a failed
/// delivery does not.
pub async fn function_handler(
    config: &Config,
    http: &reqwest::Client,
    event: LambdaEvent<SnsEvent>,
) -> Result<(), Error> {
    debug!("received {} sns record(s)", event.payload.records.len());
    let record = event
        .payload
        .records
        .first()
        .ok_or_else(|| NotifyError::malformed("no sns records in event"))?;
    let parsed = Notification::from_record(record)?;

    let classified = match notification::classify(&parsed)? {
        Some(classified) => classified,
        None => {
            warn!("unsupported sns notification, nothing to post");
            return Ok(());
        }
    };
    let message = slack::format_message(config, &parsed, &classified)?;

    match delivery::post(http, &config.hook_url, &message).await {
        Ok(()) => info!("message posted to {}", message.channel),
        Err(DeliveryError::Status { status, reason }) => {
            error!("request failed: {} {}", status, reason)
        }
        Err(DeliveryError::Connection(e)) => error!("server connection failed: {}", e),
        Err(e) => error!("{}", e),
    }
    Ok(())
}
