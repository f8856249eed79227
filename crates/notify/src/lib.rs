//! Manual-intervention notifications for tag remediation.
//!
//! When a resource cannot be tagged automatically, a human is asked to do it.
//! This crate delivers that request to SNS, Slack, or both. Delivery is
//! best-effort: failures are logged and never reach the caller.
//!
//! # Usage
//!
//! ```no_run
//! use notify::{Notifier, NotifyEvent};
//!
//! # async fn example(sdk_config: aws_config::SdkConfig) {
//! let notifier = Notifier::from_env(&sdk_config);
//!
//! notifier
//!     .notify(NotifyEvent::unsupported_resource(
//!         "AWS::RDS::DBParameterGroup",
//!         "default.mysql8.0",
//!         "Resource type AWS::RDS::DBParameterGroup does not support auto-tagging",
//!     ))
//!     .await;
//! # }
//! ```
//!
//! # Configuration
//!
//! - `SNS_TOPIC_ARN`: SNS topic to publish to (enables the SNS channel)
//! - `SLACK_WEBHOOK_URL`: Slack incoming webhook (enables the Slack channel)
//! - `NOTIFY_DISABLED`: Set to "true" to disable all notifications

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod channels;
pub mod error;
pub mod events;

pub use channels::slack::SlackChannel;
pub use channels::sns::SnsChannel;
pub use channels::NotifyChannel;
pub use error::ChannelError;
pub use events::{NotifyEvent, Severity};

use std::sync::Arc;
use tracing::{debug, info, warn};

/// Environment variable to disable all notifications.
const ENV_NOTIFY_DISABLED: &str = "NOTIFY_DISABLED";

/// Central notification dispatcher.
///
/// The `Notifier` holds the enabled channels and delivers each event to all
/// of them. It never fails: a channel error is logged and dropped.
pub struct Notifier {
    channels: Vec<Arc<dyn NotifyChannel>>,
    disabled: bool,
}

impl Notifier {
    /// Create a new notifier from environment variables.
    ///
    /// Channels are enabled based on which environment variables are set.
    #[must_use]
    pub fn from_env(sdk_config: &aws_config::SdkConfig) -> Self {
        Self::from_lookup(sdk_config, |name| std::env::var(name).ok())
    }

    /// Create a notifier through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup<F>(sdk_config: &aws_config::SdkConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let disabled = lookup(ENV_NOTIFY_DISABLED)
            .is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1");

        if disabled {
            info!("Notifications disabled via NOTIFY_DISABLED");
            return Self::disabled();
        }

        let mut channels: Vec<Arc<dyn NotifyChannel>> = vec![];

        let sns = SnsChannel::from_lookup(sdk_config, &lookup);
        if sns.enabled() {
            info!("SNS notifications enabled");
            channels.push(Arc::new(sns));
        }

        let slack = SlackChannel::from_lookup(&lookup);
        if slack.enabled() {
            info!("Slack notifications enabled");
            channels.push(Arc::new(slack));
        }

        if channels.is_empty() {
            info!("No notification channels configured, manual-tagging requests will only be logged");
        } else {
            info!(
                channel_count = channels.len(),
                "Notification system initialized"
            );
        }

        Self {
            channels,
            disabled: false,
        }
    }

    /// Create a notifier with specific channels.
    #[must_use]
    pub fn with_channels(channels: Vec<Arc<dyn NotifyChannel>>) -> Self {
        Self {
            channels,
            disabled: false,
        }
    }

    /// Create a disabled notifier (for testing or when notifications are off).
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            channels: vec![],
            disabled: true,
        }
    }

    /// Check if any notification channels are enabled.
    #[must_use]
    pub fn has_channels(&self) -> bool {
        !self.disabled && !self.channels.is_empty()
    }

    /// Deliver an event to every enabled channel, best-effort.
    ///
    /// Channels are tried one after another and the call returns once all
    /// of them have finished. Errors are logged but not propagated.
    pub async fn notify(&self, event: NotifyEvent) {
        if !self.has_channels() {
            debug!(
                resource_type = event.resource_type(),
                resource_id = event.resource_id(),
                "No notification channel configured, skipping notification"
            );
            return;
        }

        for (channel, result) in self.notify_and_wait(event).await {
            match result {
                Ok(()) => debug!(channel = %channel, "Notification sent"),
                Err(e) => warn!(
                    channel = %channel,
                    error = %e,
                    "Failed to send notification"
                ),
            }
        }
    }

    /// Send a notification and collect the per-channel results.
    ///
    /// Unlike `notify()`, the errors are handed back instead of logged.
    pub async fn notify_and_wait(
        &self,
        event: NotifyEvent,
    ) -> Vec<(String, Result<(), ChannelError>)> {
        if !self.has_channels() {
            return vec![];
        }

        let mut results = vec![];

        for channel in &self.channels {
            if !channel.enabled() {
                debug!(channel = channel.name(), "Channel disabled, skipping");
                continue;
            }
            let channel_name = channel.name().to_string();
            let result = channel.send(&event).await;
            results.push((channel_name, result));
        }

        results
    }
}
