//! Amazon SNS topic notification channel.

use async_trait::async_trait;
use aws_sdk_sns as sns;
use tracing::debug;

use crate::error::ChannelError;
use crate::events::NotifyEvent;
use crate::NotifyChannel;

/// Environment variable for the SNS topic ARN.
const ENV_SNS_TOPIC_ARN: &str = "SNS_TOPIC_ARN";

/// SNS rejects subjects longer than this.
const MAX_SUBJECT_LEN: usize = 100;

/// Publishes manual-tagging requests to an SNS topic.
pub struct SnsChannel {
    topic_arn: Option<String>,
    client: sns::Client,
}

impl SnsChannel {
    /// Create a new SNS channel from environment variables.
    ///
    /// An unset or blank `SNS_TOPIC_ARN` leaves the channel disabled.
    #[must_use]
    pub fn from_env(sdk_config: &aws_config::SdkConfig) -> Self {
        Self::from_lookup(sdk_config, |name| std::env::var(name).ok())
    }

    /// Create a new SNS channel through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup<F>(sdk_config: &aws_config::SdkConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let topic_arn = lookup(ENV_SNS_TOPIC_ARN).filter(|arn| !arn.trim().is_empty());

        if topic_arn.is_some() {
            debug!("SNS notifications enabled");
        } else {
            debug!("SNS notifications disabled (SNS_TOPIC_ARN not set)");
        }

        Self {
            topic_arn,
            client: sns::Client::new(sdk_config),
        }
    }

    /// Create an SNS channel for a specific topic.
    #[must_use]
    pub fn new(client: sns::Client, topic_arn: impl Into<String>) -> Self {
        Self {
            topic_arn: Some(topic_arn.into()),
            client,
        }
    }

    fn subject_for(event: &NotifyEvent) -> String {
        event.subject().chars().take(MAX_SUBJECT_LEN).collect()
    }
}

#[async_trait]
impl NotifyChannel for SnsChannel {
    fn name(&self) -> &'static str {
        "sns"
    }

    fn enabled(&self) -> bool {
        self.topic_arn.is_some()
    }

    async fn send(&self, event: &NotifyEvent) -> Result<(), ChannelError> {
        let topic_arn = self
            .topic_arn
            .as_deref()
            .ok_or_else(|| ChannelError::NotConfigured(ENV_SNS_TOPIC_ARN.to_string()))?;

        debug!(channel = "sns", topic_arn, subject = %event.subject(), "Publishing notification");

        let output = self
            .client
            .publish()
            .topic_arn(topic_arn)
            .subject(Self::subject_for(event))
            .message(event.body())
            .send()
            .await
            .map_err(|e| ChannelError::Sns(sns::error::DisplayErrorContext(&e).to_string()))?;

        debug!(
            channel = "sns",
            message_id = output.message_id().unwrap_or_default(),
            "Notification published"
        );
        Ok(())
    }
}
