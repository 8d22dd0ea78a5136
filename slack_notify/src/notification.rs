use crate::error::NotifyError;
use aws_lambda_events::event::sns::SnsRecord;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

/// Timestamps embedded in CodeDeploy message bodies, e.g.
/// "Thu Feb 12 01:02:03 UTC 2026".
const EVENT_TIME_FORMAT: &str = "%a %b %d %H:%M:%S %Z %Y";

/// Display offset for all rendered timestamps.
pub fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("fixed +09:00 offset")
}

/// Parses a message-body timestamp, interpreting it as UTC and converting
/// to the display offset.
pub fn parse_event_time(raw: &str) -> Result<DateTime<FixedOffset>, NotifyError> {
    let naive = NaiveDateTime::parse_from_str(raw, EVENT_TIME_FORMAT)
        .map_err(|e| NotifyError::malformed(format!("bad timestamp {:?}: {}", raw, e)))?;
    Ok(naive.and_utc().with_timezone(&jst()))
}

/// One SNS record with its message body parsed and its envelope timestamp
/// shifted to the display offset. Built once per invocation.
#[derive(Debug, Clone)]
pub struct Notification {
    pub subject: String,
    pub message: Map<String, Value>,
    pub timestamp: DateTime<FixedOffset>,
}

impl Notification {
    pub fn from_record(record: &SnsRecord) -> Result<Self, NotifyError> {
        let subject = record.sns.subject.clone().unwrap_or_default();
        let message: Value = serde_json::from_str(&record.sns.message)
            .map_err(|e| NotifyError::malformed(format!("message body is not JSON: {}", e)))?;
        let message = match message {
            Value::Object(map) => map,
            other => {
                return Err(NotifyError::malformed(format!(
                    "message body is not a JSON object: {}",
                    other
                )))
            }
        };
        let timestamp = record.sns.timestamp.with_timezone(&jst());
        info!(
            "sns record: subject={:?} timestamp={} message={}",
            subject,
            timestamp.to_rfc3339(),
            serde_json::Value::Object(message.clone())
        );
        Ok(Notification {
            subject,
            message,
            timestamp,
        })
    }
}

/// An AutoScaling lifecycle event, discriminated by the presence of
/// `AutoScalingGroupARN` in the message body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AutoScalingNotification {
    #[serde(rename = "AutoScalingGroupARN")]
    pub auto_scaling_group_arn: String,
    pub auto_scaling_group_name: String,
    pub event: String,
    pub description: Option<String>,
    pub status_code: Option<String>,
    pub status_message: Option<String>,
    pub cause: Option<String>,
}

impl AutoScalingNotification {
    /// The region is the fourth colon-delimited segment of the group ARN
    /// (arn:aws:autoscaling:<region>:...).
    pub fn region(&self) -> Result<&str, NotifyError> {
        self.auto_scaling_group_arn.split(':').nth(3).ok_or_else(|| {
            NotifyError::malformed(format!(
                "no region in AutoScalingGroupARN {:?}",
                self.auto_scaling_group_arn
            ))
        })
    }
}

/// A CodeDeploy deployment-status event (no `instanceId` in the body).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentNotification {
    pub region: String,
    pub account_id: String,
    pub deployment_id: String,
    pub application_name: Option<String>,
    pub deployment_group_name: Option<String>,
    pub status: String,
    pub create_time: String,
    pub complete_time: Option<String>,
    pub deployment_overview: Option<String>,
    pub error_information: Option<String>,
}

/// A CodeDeploy per-instance event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceNotification {
    pub region: String,
    pub account_id: String,
    pub deployment_id: String,
    pub instance_id: String,
    pub last_updated_at: String,
    pub instance_status: String,
    pub lifecycle_events: String,
}

/// The supported notification families.
#[derive(Debug, Clone)]
pub enum AwsNotification {
    AutoScaling(AutoScalingNotification),
    Deployment(DeploymentNotification),
    Instance(InstanceNotification),
}

/// Decides which family a message body belongs to and decodes it. Returns
/// `None` for bodies matching neither family; missing required fields in a
/// matched family are a malformed payload.
pub fn classify(notification: &Notification) -> Result<Option<AwsNotification>, NotifyError> {
    let body = Value::Object(notification.message.clone());
    if notification.message.contains_key("AutoScalingGroupARN") {
        let parsed: AutoScalingNotification = serde_json::from_value(body)
            .map_err(|e| NotifyError::malformed(format!("bad AutoScaling message: {}", e)))?;
        Ok(Some(AwsNotification::AutoScaling(parsed)))
    } else if notification.message.contains_key("deploymentId") {
        if notification.message.contains_key("instanceId") {
            let parsed: InstanceNotification = serde_json::from_value(body)
                .map_err(|e| NotifyError::malformed(format!("bad instance message: {}", e)))?;
            // lifecycleEvents is an embedded JSON string; its content never
            // reaches the output, but a garbled one still fails the invocation.
            if !parsed.lifecycle_events.is_empty() {
                serde_json::from_str::<Value>(&parsed.lifecycle_events).map_err(|e| {
                    NotifyError::malformed(format!("bad lifecycleEvents: {}", e))
                })?;
            }
            Ok(Some(AwsNotification::Instance(parsed)))
        } else {
            let parsed: DeploymentNotification = serde_json::from_value(body)
                .map_err(|e| NotifyError::malformed(format!("bad deployment message: {}", e)))?;
            Ok(Some(AwsNotification::Deployment(parsed)))
        }
    } else {
        Ok(None)
    }
}
