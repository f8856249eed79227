//! Error types for the notification system.

use thiserror::Error;

/// Errors that can occur when sending notifications.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Channel is not configured
    #[error("Channel not configured: {0}")]
    NotConfigured(String),

    /// The SNS publish call was rejected or could not be sent
    #[error("SNS publish failed: {0}")]
    Sns(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}
