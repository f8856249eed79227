//! # Tag Remediation
//!
//! Reacts to AWS Config compliance changes for the `required-tag-*` rules.
//! When a resource is flagged `NON_COMPLIANT`, the handler builds its ARN,
//! reads its current tags, computes the default tag set, and writes only the
//! keys the resource is missing. Resource kinds that cannot be tagged
//! automatically, and failed tag writes, are handed to a human through
//! [`notify`].
//!
//! ## Flow
//!
//! 1. [`event`]: normalize the EventBridge or direct envelope
//! 2. [`resources`]: eligibility table and ARN templates
//! 3. [`clients`]: current tags from the tag store
//! 4. [`labels`]: default generation and the non-overwriting merge
//! 5. [`handler`]: apply, or notify
//!
//! ```no_run
//! use std::sync::Arc;
//! use tag_remediation::aws::{load_sdk_config, SsmDefaultTags, StsIdentityResolver, TaggingApiStore};
//! use tag_remediation::{HandlerConfig, RemediationHandler};
//!
//! # async fn example(payload: serde_json::Value) -> anyhow::Result<()> {
//! let config = HandlerConfig::from_env();
//! let sdk_config = load_sdk_config(&config.region).await;
//! let handler = RemediationHandler::new(
//!     config.clone(),
//!     Arc::new(StsIdentityResolver::new(&sdk_config, config.region.clone())),
//!     Arc::new(TaggingApiStore::new(&sdk_config)),
//!     Arc::new(SsmDefaultTags::new(&sdk_config)),
//!     notify::Notifier::from_env(&sdk_config),
//! );
//! let response = handler.handle(&payload).await;
//! println!("{}", serde_json::to_string(&response)?);
//! # Ok(())
//! # }
//! ```

pub mod aws;
pub mod clients;
pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod labels;
pub mod resources;
pub mod response;

pub use config::HandlerConfig;
pub use error::{RemediationError, RemediationResult, ServiceError};
pub use handler::RemediationHandler;
pub use labels::LabelSet;
pub use response::HandlerResponse;
