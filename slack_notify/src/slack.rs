use crate::config::Config;
use crate::error::NotifyError;
use crate::notification::{
    parse_event_time, AutoScalingNotification, AwsNotification, DeploymentNotification,
    InstanceNotification, Notification,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Attachment color bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Good,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub title: String,
    pub value: Option<String>,
    pub short: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretext: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub fields: Vec<Field>,
    pub mrkdwn_in: Vec<String>,
}

/// The webhook payload. Field order matters to the consumer only within
/// `attachments[].fields`, which renders top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub channel: String,
    pub username: String,
    pub icon_emoji: String,
    pub attachments: Vec<Attachment>,
}

fn field(title: &str, value: Option<String>, short: bool) -> Field {
    Field {
        title: String::from(title),
        value,
        short,
    }
}

fn mrkdwn_in_fields() -> Vec<String> {
    vec![String::from("fields")]
}

/// Builds the family-specific payload and forces the configured channel,
/// overriding anything a formatter set.
pub fn format_message(
    config: &Config,
    notification: &Notification,
    classified: &AwsNotification,
) -> Result<Message, NotifyError> {
    let mut message = match classified {
        AwsNotification::AutoScaling(asg) => auto_scaling_message(&notification.subject, asg)?,
        AwsNotification::Instance(instance) => instance_message(&notification.subject, instance),
        AwsNotification::Deployment(deployment) => {
            deployment_message(&notification.subject, deployment)?
        }
    };
    message.channel = config.channel.clone();
    Ok(message)
}

fn auto_scaling_color(event: &str) -> Color {
    if event.contains("EC2_INSTANCE_LAUNCH_ERROR") || event.contains("EC2_INSTANCE_TERMINATE_ERROR")
    {
        Color::Danger
    } else if event.contains("EC2_INSTANCE_LAUNCH") || event.contains("EC2_INSTANCE_TERMINATE") {
        Color::Good
    } else {
        Color::Warning
    }
}

fn auto_scaling_message(
    subject: &str,
    asg: &AutoScalingNotification,
) -> Result<Message, NotifyError> {
    let region = asg.region()?;
    let color = auto_scaling_color(&asg.event);
    let link = format!(
        "https://{region}.console.aws.amazon.com/ec2/autoscaling/home?region={region}#AutoScalingGroups:id={asg};view=history",
        region = region,
        asg = asg.auto_scaling_group_name
    );

    let mut fields = vec![
        field(
            "AutoScalingGroupName",
            Some(asg.auto_scaling_group_name.clone()),
            true,
        ),
        field("Event", Some(asg.event.clone()), true),
    ];
    if let Some(status_code) = &asg.status_code {
        fields.push(field("StatusCode", Some(status_code.clone()), true));
    }
    if let Some(status_message) = &asg.status_message {
        fields.push(field("StatusMessage", Some(status_message.clone()), false));
    }

    let cause = asg.cause.clone().unwrap_or_else(|| String::from("None"));
    Ok(Message {
        channel: String::new(),
        username: String::from("aws-autoscaling"),
        icon_emoji: String::from(":robot_face:"),
        attachments: vec![
            Attachment {
                fallback: Some(String::from(subject)),
                color: Some(color),
                pretext: Some(String::from("AWS AutoScaling Notification")),
                title: Some(String::from(subject)),
                title_link: Some(link),
                text: asg.description.clone(),
                fields,
                mrkdwn_in: mrkdwn_in_fields(),
            },
            Attachment {
                fallback: None,
                color: Some(color),
                pretext: None,
                title: None,
                title_link: None,
                text: None,
                fields: vec![field("Cause", Some(cause), false)],
                mrkdwn_in: mrkdwn_in_fields(),
            },
        ],
    })
}

fn code_deploy_link(region: &str, deployment_id: &str) -> String {
    format!(
        "https://{region}.console.aws.amazon.com/codedeploy/home?region={region}#/deployments/{deployment_id}",
        region = region,
        deployment_id = deployment_id
    )
}

fn instance_message(subject: &str, instance: &InstanceNotification) -> Message {
    let color = match instance.instance_status.as_str() {
        "Succeeded" => Some(Color::Good),
        "Failed" => Some(Color::Danger),
        _ => None,
    };
    let fields = vec![
        field("InstanceId", Some(instance.instance_id.clone()), true),
        field(
            "InstanceStatus",
            Some(instance.instance_status.clone()),
            true,
        ),
    ];
    Message {
        channel: String::new(),
        username: String::from("aws-codedeploy"),
        icon_emoji: String::from(":whale:"),
        attachments: vec![Attachment {
            fallback: Some(String::from(subject)),
            color,
            pretext: Some(String::from("AWS CodeDeploy Notification")),
            title: Some(format!("Deployment: {}", instance.deployment_id)),
            title_link: Some(code_deploy_link(&instance.region, &instance.deployment_id)),
            text: Some(String::from(subject)),
            fields,
            mrkdwn_in: mrkdwn_in_fields(),
        }],
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DeploymentOverview {
    #[serde(default)]
    succeeded: u64,
    #[serde(default)]
    failed: u64,
    #[serde(default)]
    in_progress: u64,
    #[serde(default)]
    pending: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorInformation {
    error_code: Option<String>,
    error_message: Option<String>,
}

fn deployment_message(
    subject: &str,
    deployment: &DeploymentNotification,
) -> Result<Message, NotifyError> {
    let color = match deployment.status.as_str() {
        "SUCCEEDED" => Some(Color::Good),
        "ABORTED" | "FAILED" => Some(Color::Danger),
        _ => None,
    };

    let mut fields = vec![
        field("Application", deployment.application_name.clone(), true),
        field(
            "DeploymentGroup",
            deployment.deployment_group_name.clone(),
            true,
        ),
        field("Status", Some(deployment.status.clone()), true),
    ];

    if let Some(raw) = &deployment.deployment_overview {
        let overview: DeploymentOverview = serde_json::from_str(raw)
            .map_err(|e| NotifyError::malformed(format!("bad deploymentOverview: {}", e)))?;
        fields.push(field(
            "DeploymentOverview",
            Some(format!(
                "Succeeded:{}, Failed:{}, InProgress:{}, Pending:{}",
                overview.succeeded, overview.failed, overview.in_progress, overview.pending
            )),
            false,
        ));
    }

    if let Some(raw) = &deployment.error_information {
        let error_information: ErrorInformation = serde_json::from_str(raw)
            .map_err(|e| NotifyError::malformed(format!("bad errorInformation: {}", e)))?;
        fields.push(field("ErrorCode", error_information.error_code, true));
        fields.push(field("ErrorMessage", error_information.error_message, false));
    }

    // createTime/completeTime never reach the payload, but a timestamp that
    // does not parse still fails the invocation.
    let create_time = parse_event_time(&deployment.create_time)?;
    let complete_time = deployment
        .complete_time
        .as_deref()
        .map(parse_event_time)
        .transpose()?;
    debug!(
        "deployment {} created {} completed {:?}",
        deployment.deployment_id,
        create_time.to_rfc3339(),
        complete_time.map(|t| t.to_rfc3339())
    );

    Ok(Message {
        channel: String::new(),
        username: String::from("aws-codedeploy"),
        icon_emoji: String::from(":whale:"),
        attachments: vec![Attachment {
            fallback: Some(String::from(subject)),
            color,
            pretext: Some(String::from("AWS CodeDeploy Notification")),
            title: Some(format!("Deployment: {}", deployment.deployment_id)),
            title_link: Some(code_deploy_link(
                &deployment.region,
                &deployment.deployment_id,
            )),
            text: Some(String::from(subject)),
            fields,
            mrkdwn_in: mrkdwn_in_fields(),
        }],
    })
}
