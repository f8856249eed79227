//! AWS Config compliance-change events.
//!
//! Config delivers the same evaluation result in two envelopes: wrapped in an
//! EventBridge `detail` object, or as a direct notification with
//! `newEvaluationResult` at the top level. [`EventEnvelope`] normalizes both so
//! the rest of the handler only ever sees an [`EvaluationResult`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RemediationError, RemediationResult};

/// Compliance verdict reported by AWS Config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceType {
    Compliant,
    NonCompliant,
    NotApplicable,
    InsufficientData,
    #[serde(other)]
    Other,
}

/// The shape an event arrived in.
#[derive(Debug)]
pub enum EventEnvelope {
    /// `{ "detail": { "newEvaluationResult": ... } }`
    EventBridge(ConfigNotification),
    /// `{ "newEvaluationResult": ... }`
    Direct(ConfigNotification),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigNotification {
    #[serde(default)]
    pub new_evaluation_result: Option<EvaluationResult>,
}

/// Only the compliance type is decoded up front; the identifier stays raw until
/// the event is known to need remediation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    #[serde(default)]
    pub compliance_type: Option<ComplianceType>,
    #[serde(default)]
    pub evaluation_result_identifier: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResultIdentifier {
    #[serde(default)]
    pub evaluation_result_qualifier: Option<EvaluationResultQualifier>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResultQualifier {
    #[serde(default)]
    pub config_rule_name: Option<String>,
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub resource_id: Option<String>,
}

/// A non-compliant resource extracted from an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplianceEvent {
    pub compliance_type: ComplianceType,
    pub resource_type: String,
    pub resource_id: String,
    pub rule_name: Option<String>,
}

impl EventEnvelope {
    /// Recognize the envelope and decode its notification.
    pub fn from_payload(payload: &Value) -> RemediationResult<Self> {
        let Value::Object(fields) = payload else {
            return Err(RemediationError::MalformedEvent {
                reason: "event payload is not a JSON object".to_string(),
            });
        };

        let decode = |value: Value| {
            serde_json::from_value::<ConfigNotification>(value).map_err(|e| {
                RemediationError::MalformedEvent {
                    reason: e.to_string(),
                }
            })
        };

        match fields.get("detail") {
            Some(detail) => decode(detail.clone()).map(Self::EventBridge),
            None => decode(payload.clone()).map(Self::Direct),
        }
    }

    /// Unwrap to the evaluation result; a missing result decodes as empty.
    #[must_use]
    pub fn into_evaluation(self) -> EvaluationResult {
        match self {
            Self::EventBridge(notification) | Self::Direct(notification) => notification
                .new_evaluation_result
                .unwrap_or_default(),
        }
    }
}

impl EvaluationResult {
    #[must_use]
    pub fn is_non_compliant(&self) -> bool {
        self.compliance_type == Some(ComplianceType::NonCompliant)
    }

    /// Pull out the resource the result is about.
    ///
    /// Fails when the resource type or id is missing or empty.
    pub fn into_event(self) -> RemediationResult<ComplianceEvent> {
        let compliance_type = self.compliance_type.unwrap_or(ComplianceType::Other);
        let qualifier = match self.evaluation_result_identifier {
            Some(identifier) => serde_json::from_value::<EvaluationResultIdentifier>(identifier)
                .map_err(|e| RemediationError::MalformedEvent {
                    reason: e.to_string(),
                })?
                .evaluation_result_qualifier
                .unwrap_or_default(),
            None => EvaluationResultQualifier::default(),
        };

        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

        let (Some(resource_type), Some(resource_id)) = (
            non_empty(qualifier.resource_type),
            non_empty(qualifier.resource_id),
        ) else {
            return Err(RemediationError::MalformedEvent {
                reason: "missing resource type or ID in event".to_string(),
            });
        };

        Ok(ComplianceEvent {
            compliance_type,
            resource_type,
            resource_id,
            rule_name: qualifier.config_rule_name,
        })
    }
}
