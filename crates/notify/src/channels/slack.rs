//! Slack webhook notification channel.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ChannelError;
use crate::events::{NotifyEvent, Severity};
use crate::NotifyChannel;

/// Environment variable for Slack webhook URL.
const ENV_SLACK_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";

/// Slack webhook notification channel.
pub struct SlackChannel {
    webhook_url: Option<String>,
    client: reqwest::Client,
}

impl SlackChannel {
    /// Create a new Slack channel from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create a new Slack channel through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let webhook_url = lookup(ENV_SLACK_WEBHOOK_URL).filter(|url| !url.trim().is_empty());

        if webhook_url.is_some() {
            debug!("Slack notifications enabled");
        } else {
            debug!("Slack notifications disabled (SLACK_WEBHOOK_URL not set)");
        }

        Self {
            webhook_url,
            client: reqwest::Client::new(),
        }
    }

    /// Create a Slack channel with a specific webhook URL.
    #[must_use]
    pub fn new(webhook_url: String) -> Self {
        Self {
            webhook_url: Some(webhook_url),
            client: reqwest::Client::new(),
        }
    }

    /// Format an event as a Slack webhook payload.
    fn format_payload(event: &NotifyEvent) -> SlackPayload {
        let color = match event.severity() {
            Severity::Warning => "#f39c12",  // Orange
            Severity::Critical => "#e74c3c", // Red
        };

        let fields = Self::format_fields(event)
            .into_iter()
            .map(|(title, value)| SlackField {
                title,
                value,
                short: true,
            })
            .collect();

        let attachment = SlackAttachment {
            fallback: event.subject(),
            color: color.to_string(),
            author_name: Some("Tag Remediation".to_string()),
            title: event.subject(),
            text: format!(
                "{}\nPlease add the required tags manually via the AWS Console or CLI.",
                event.reason()
            ),
            fields,
            footer: Some(format!(
                "{} | {}",
                event.severity().as_str(),
                event.timestamp().format("%Y-%m-%d %H:%M:%S UTC")
            )),
            ts: Some(event.timestamp().timestamp()),
        };

        SlackPayload {
            attachments: vec![attachment],
        }
    }

    /// Format additional fields for an event.
    fn format_fields(event: &NotifyEvent) -> Vec<(String, String)> {
        let mut fields = vec![
            ("Resource Type".to_string(), event.resource_type().to_string()),
            ("Resource ID".to_string(), event.resource_id().to_string()),
        ];
        if let NotifyEvent::TaggingFailed { resource_arn, .. } = event {
            fields.push(("Resource ARN".to_string(), resource_arn.clone()));
        }
        fields
    }
}

#[async_trait]
impl NotifyChannel for SlackChannel {
    fn name(&self) -> &'static str {
        "slack"
    }

    fn enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    async fn send(&self, event: &NotifyEvent) -> Result<(), ChannelError> {
        let webhook_url = self
            .webhook_url
            .as_ref()
            .ok_or_else(|| ChannelError::NotConfigured(ENV_SLACK_WEBHOOK_URL.to_string()))?;

        let payload = Self::format_payload(event);

        debug!(channel = "slack", subject = %event.subject(), "Sending notification");

        let response = self.client.post(webhook_url).json(&payload).send().await?;

        if response.status().is_success() {
            debug!(channel = "slack", "Notification sent successfully");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            warn!(
                channel = "slack",
                status = %status,
                body = %body,
                "Slack webhook request failed"
            );

            Err(ChannelError::Other(format!(
                "Slack returned {status}: {body}"
            )))
        }
    }
}

// =============================================================================
// Slack API types
// =============================================================================

#[derive(Debug, Serialize)]
struct SlackPayload {
    attachments: Vec<SlackAttachment>,
}

#[derive(Debug, Serialize)]
struct SlackAttachment {
    fallback: String,
    color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    author_name: Option<String>,
    title: String,
    text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<SlackField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    footer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ts: Option<i64>,
}

#[derive(Debug, Serialize)]
struct SlackField {
    title: String,
    value: String,
    short: bool,
}
