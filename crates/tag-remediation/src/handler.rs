//! The remediation handler: one compliance event in, one response out.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use futures::FutureExt;
use notify::{Notifier, NotifyEvent};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::clients::{DefaultTagSource, IdentityResolver, TagStore};
use crate::config::HandlerConfig;
use crate::error::{RemediationError, RemediationResult};
use crate::event::EventEnvelope;
use crate::labels::{missing_tag_from_rule_name, tags_to_apply, DefaultTagPolicy, LabelSet};
use crate::resources::{is_taggable, resource_arn};
use crate::response::{HandlerResponse, Outcome};

/// Reason sent to humans when the tagging API rejects an update.
pub const APPLY_FAILURE_REASON: &str = "Failed to auto-tag. Manual intervention required.";

/// Applies missing default tags to resources flagged by AWS Config.
pub struct RemediationHandler {
    config: HandlerConfig,
    policy: DefaultTagPolicy,
    identity: Arc<dyn IdentityResolver>,
    tag_store: Arc<dyn TagStore>,
    default_tags: Arc<dyn DefaultTagSource>,
    notifier: Notifier,
}

impl RemediationHandler {
    #[must_use]
    pub fn new(
        config: HandlerConfig,
        identity: Arc<dyn IdentityResolver>,
        tag_store: Arc<dyn TagStore>,
        default_tags: Arc<dyn DefaultTagSource>,
        notifier: Notifier,
    ) -> Self {
        let policy = DefaultTagPolicy::new(config.environment.clone());
        Self {
            config,
            policy,
            identity,
            tag_store,
            default_tags,
            notifier,
        }
    }

    /// Handle one event. Never fails and never panics: every fault becomes a
    /// response with an error status.
    pub async fn handle(&self, payload: &Value) -> HandlerResponse {
        debug!(event = %payload, "Received event");

        match AssertUnwindSafe(self.process(payload)).catch_unwind().await {
            Ok(Ok(outcome)) => outcome.into(),
            Ok(Err(error)) => {
                match &error {
                    RemediationError::MalformedEvent { reason } => {
                        error!(reason = %reason, "Missing resource type or ID in event");
                    }
                    RemediationError::UnsupportedResourceType { .. } => {}
                    other => {
                        error!(
                            category = other.category(),
                            error = %other,
                            "Error processing event"
                        );
                    }
                }
                HandlerResponse::from(&error)
            }
            Err(panic) => {
                let error = RemediationError::Internal {
                    details: panic_message(panic.as_ref()),
                };
                error!(error = %error, event = %payload, "Error processing event");
                HandlerResponse::from(&error)
            }
        }
    }

    /// Handle one event given as raw JSON text. Text that is not JSON is a
    /// malformed event.
    pub async fn handle_raw(&self, raw: &str) -> HandlerResponse {
        match serde_json::from_str::<Value>(raw) {
            Ok(payload) => self.handle(&payload).await,
            Err(e) => {
                let error = RemediationError::MalformedEvent {
                    reason: format!("event is not valid JSON: {e}"),
                };
                error!(error = %error, "Could not decode event");
                HandlerResponse::from(&error)
            }
        }
    }

    async fn process(&self, payload: &Value) -> RemediationResult<Outcome> {
        let evaluation = EventEnvelope::from_payload(payload)?.into_evaluation();

        if !evaluation.is_non_compliant() {
            info!(
                compliance_type = ?evaluation.compliance_type,
                "Resource is not NON_COMPLIANT, no action needed"
            );
            return Ok(Outcome::Compliant);
        }

        let event = evaluation.into_event()?;
        info!(
            resource_type = %event.resource_type,
            resource_id = %event.resource_id,
            "Processing non-compliant resource"
        );

        if !is_taggable(&event.resource_type) {
            let error = RemediationError::UnsupportedResourceType {
                resource_type: event.resource_type.clone(),
            };
            warn!(resource_id = %event.resource_id, "{error}");
            self.notifier
                .notify(NotifyEvent::unsupported_resource(
                    &event.resource_type,
                    &event.resource_id,
                    error.to_string(),
                ))
                .await;
            return Err(error);
        }

        let account = self
            .identity
            .resolve()
            .await
            .map_err(RemediationError::IdentityLookup)?;
        let arn = resource_arn(&event.resource_type, &event.resource_id, &account)?;

        let current = self
            .tag_store
            .get_tags(&arn)
            .await
            .map_err(|source| RemediationError::LabelQuery {
                arn: arn.clone(),
                source,
            })?
            .unwrap_or_default();

        let missing_tag = missing_tag_from_rule_name(event.rule_name.as_deref());
        debug!(missing_tag = %missing_tag, current_tags = current.len(), "Derived missing tag");

        let overrides = self.fetch_default_tags().await;
        let defaults = self
            .policy
            .generate(overrides.as_ref(), Utc::now().date_naive());

        let to_apply = tags_to_apply(&defaults, &current);
        if to_apply.is_empty() {
            info!(arn = %arn, "No new tags to apply");
            return Ok(Outcome::NothingToApply { arn });
        }

        if let Err(source) = self.tag_store.apply_tags(&arn, &to_apply).await {
            let error = RemediationError::LabelApply {
                arn: arn.clone(),
                source,
            };
            error!(error = %error, "Failed to apply tags");
            self.notifier
                .notify(NotifyEvent::tagging_failed(
                    &event.resource_type,
                    &event.resource_id,
                    &arn,
                    APPLY_FAILURE_REASON,
                ))
                .await;
            return Err(error);
        }

        info!(arn = %arn, tags = ?to_apply, "Successfully applied tags");
        Ok(Outcome::Applied {
            arn,
            tags: to_apply,
            missing_tag,
        })
    }

    /// Account-wide overrides; a failed fetch degrades to the static fallbacks.
    async fn fetch_default_tags(&self) -> Option<LabelSet> {
        let parameter = &self.config.default_tags_parameter;
        match self.default_tags.fetch(parameter).await {
            Ok(Some(tags)) => Some(tags),
            Ok(None) => {
                warn!(parameter = %parameter, "Default tags parameter not found, using fallbacks");
                None
            }
            Err(e) => {
                warn!(parameter = %parameter, error = %e, "Could not retrieve default tags");
                None
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("handler panicked: {detail}")
}
