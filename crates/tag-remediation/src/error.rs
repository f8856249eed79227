use thiserror::Error;

/// A failed call to an external collaborator (STS, SSM, the tagging API).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{service} request failed: {details}")]
pub struct ServiceError {
    /// Short service name, e.g. `"ssm"`
    pub service: &'static str,
    /// Provider error rendered for logs
    pub details: String,
}

impl ServiceError {
    #[must_use]
    pub fn new(service: &'static str, details: impl Into<String>) -> Self {
        Self {
            service,
            details: details.into(),
        }
    }
}

/// Every way a single remediation invocation can stop short.
#[derive(Error, Debug, Clone)]
pub enum RemediationError {
    /// The event payload lacks the resource type or id
    #[error("Malformed compliance event: {reason}")]
    MalformedEvent { reason: String },

    /// The resource kind is not in the auto-tagging table
    #[error("Resource type {resource_type} does not support auto-tagging")]
    UnsupportedResourceType { resource_type: String },

    /// No ARN template exists for the resource kind
    #[error("Could not determine ARN for {resource_type}/{resource_id}")]
    UnsupportedIdentifier {
        resource_type: String,
        resource_id: String,
    },

    /// Account id or region could not be resolved
    #[error("Identity lookup failed: {0}")]
    IdentityLookup(#[source] ServiceError),

    /// The current tags could not be read
    #[error("Failed to read tags for {arn}: {source}")]
    LabelQuery {
        arn: String,
        #[source]
        source: ServiceError,
    },

    /// The tagging API rejected the update
    #[error("Failed to apply tags to {arn}: {source}")]
    LabelApply {
        arn: String,
        #[source]
        source: ServiceError,
    },

    /// A fault that escaped the normal error paths
    #[error("{details}")]
    Internal { details: String },
}

/// Type alias for remediation results
pub type RemediationResult<T> = Result<T, RemediationError>;

impl RemediationError {
    /// HTTP-style status code reported to the invoker.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            RemediationError::MalformedEvent { .. } => 400,
            RemediationError::UnsupportedResourceType { .. } => 200,
            RemediationError::UnsupportedIdentifier { .. }
            | RemediationError::IdentityLookup(_)
            | RemediationError::LabelQuery { .. }
            | RemediationError::LabelApply { .. }
            | RemediationError::Internal { .. } => 500,
        }
    }

    /// Get error category as string
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            RemediationError::MalformedEvent { .. } => "malformed_input",
            RemediationError::UnsupportedResourceType { .. } => "unsupported",
            RemediationError::UnsupportedIdentifier { .. } => "unsupported_identifier",
            RemediationError::IdentityLookup(_) => "identity_error",
            RemediationError::LabelQuery { .. } => "query_error",
            RemediationError::LabelApply { .. } => "apply_error",
            RemediationError::Internal { .. } => "internal_error",
        }
    }

    /// Short message placed in the response body.
    #[must_use]
    pub fn response_message(&self) -> String {
        match self {
            RemediationError::MalformedEvent { .. } => "Invalid event".to_string(),
            RemediationError::UnsupportedResourceType { .. } => {
                "Resource type not supported".to_string()
            }
            RemediationError::UnsupportedIdentifier { .. } => {
                "Could not determine resource ARN".to_string()
            }
            RemediationError::LabelApply { .. } => "Failed to apply tags".to_string(),
            other => format!("Error: {other}"),
        }
    }
}
