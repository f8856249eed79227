//! What an invocation reports back to its invoker.

use serde::{Deserialize, Serialize};

use crate::error::RemediationError;
use crate::labels::LabelSet;

/// A handled event that needed no failure path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The evaluation was not `NON_COMPLIANT`
    Compliant,
    /// Every default tag is already present
    NothingToApply { arn: String },
    /// Missing tags were written
    Applied {
        arn: String,
        tags: LabelSet,
        missing_tag: String,
    },
}

/// Status code plus body, shaped like a Lambda proxy response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub body: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<LabelSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_tag: Option<String>,
}

impl ResponseBody {
    fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            resource: None,
            tags: None,
            missing_tag: None,
        }
    }
}

impl HandlerResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Keys written by this invocation, if any.
    #[must_use]
    pub fn applied_keys(&self) -> Vec<&str> {
        self.body
            .tags
            .as_ref()
            .map(|tags| tags.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

impl From<Outcome> for HandlerResponse {
    fn from(outcome: Outcome) -> Self {
        let body = match outcome {
            Outcome::Compliant => ResponseBody::message("Resource compliant"),
            Outcome::NothingToApply { arn } => ResponseBody {
                resource: Some(arn),
                ..ResponseBody::message("No tags needed")
            },
            Outcome::Applied {
                arn,
                tags,
                missing_tag,
            } => ResponseBody {
                message: "Tags applied successfully".to_string(),
                resource: Some(arn),
                tags: Some(tags),
                missing_tag: Some(missing_tag).filter(|tag| !tag.is_empty()),
            },
        };

        Self {
            status_code: 200,
            body,
        }
    }
}

impl From<&RemediationError> for HandlerResponse {
    fn from(error: &RemediationError) -> Self {
        let resource = match error {
            RemediationError::LabelQuery { arn, .. } | RemediationError::LabelApply { arn, .. } => {
                Some(arn.clone())
            }
            _ => None,
        };

        Self {
            status_code: error.status_code(),
            body: ResponseBody {
                resource,
                ..ResponseBody::message(error.response_message())
            },
        }
    }
}
