//! Notification event types for tag remediation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity levels for notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Warning - a human should follow up
    Warning,
    /// Critical - automation tried and failed
    Critical,
}

impl Severity {
    /// Get display name for this severity.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "Warning",
            Self::Critical => "Critical",
        }
    }
}

/// Events that ask a human to tag a resource by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotifyEvent {
    /// The resource kind cannot be tagged automatically
    UnsupportedResource {
        resource_type: String,
        resource_id: String,
        reason: String,
        #[serde(default = "Utc::now")]
        timestamp: DateTime<Utc>,
    },

    /// Automated tagging was attempted and failed
    TaggingFailed {
        resource_type: String,
        resource_id: String,
        resource_arn: String,
        reason: String,
        #[serde(default = "Utc::now")]
        timestamp: DateTime<Utc>,
    },
}

impl NotifyEvent {
    /// Build an event for a resource kind outside the auto-tagging table.
    #[must_use]
    pub fn unsupported_resource(
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnsupportedResource {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            reason: reason.into(),
            timestamp: Utc::now(),
        }
    }

    /// Build an event for a failed tag application.
    #[must_use]
    pub fn tagging_failed(
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        resource_arn: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::TaggingFailed {
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            resource_arn: resource_arn.into(),
            reason: reason.into(),
            timestamp: Utc::now(),
        }
    }

    /// Resource kind the event is about.
    #[must_use]
    pub fn resource_type(&self) -> &str {
        match self {
            Self::UnsupportedResource { resource_type, .. }
            | Self::TaggingFailed { resource_type, .. } => resource_type,
        }
    }

    /// Provider-specific resource id.
    #[must_use]
    pub fn resource_id(&self) -> &str {
        match self {
            Self::UnsupportedResource { resource_id, .. }
            | Self::TaggingFailed { resource_id, .. } => resource_id,
        }
    }

    /// Why manual intervention is needed.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::UnsupportedResource { reason, .. } | Self::TaggingFailed { reason, .. } => {
                reason
            }
        }
    }

    /// Get a short subject line for this event.
    #[must_use]
    pub fn subject(&self) -> String {
        format!("Manual Tagging Required: {}", self.resource_type())
    }

    /// Render the plain-text message body.
    #[must_use]
    pub fn body(&self) -> String {
        let mut body = format!(
            "Resource requires manual tagging:\n\n\
             Resource Type: {}\n\
             Resource ID: {}\n",
            self.resource_type(),
            self.resource_id(),
        );
        if let Self::TaggingFailed { resource_arn, .. } = self {
            body.push_str(&format!("Resource ARN: {resource_arn}\n"));
        }
        body.push_str(&format!(
            "Reason: {}\n\n\
             Please add the required tags manually via the AWS Console or CLI.\n",
            self.reason()
        ));
        body
    }

    /// Get the severity for this event.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::UnsupportedResource { .. } => Severity::Warning,
            Self::TaggingFailed { .. } => Severity::Critical,
        }
    }

    /// Get the timestamp for this event.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::UnsupportedResource { timestamp, .. }
            | Self::TaggingFailed { timestamp, .. } => *timestamp,
        }
    }
}
