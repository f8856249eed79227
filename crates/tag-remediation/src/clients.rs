//! Collaborator contracts the handler depends on.
//!
//! The AWS implementations live in [`crate::aws`]; tests substitute mocks.

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::labels::LabelSet;
use crate::resources::AccountContext;

/// Resolves the account and region that ARNs are built for.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self) -> Result<AccountContext, ServiceError>;
}

/// Reads and writes resource tags.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagStore: Send + Sync {
    /// Current tags, or `None` when the store does not know the resource.
    async fn get_tags(&self, arn: &str) -> Result<Option<LabelSet>, ServiceError>;

    /// Add `tags` to the resource. Keys not listed are left alone.
    async fn apply_tags(&self, arn: &str, tags: &LabelSet) -> Result<(), ServiceError>;
}

/// Account-wide default tags kept in a configuration store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DefaultTagSource: Send + Sync {
    /// The tag set stored under `key`, or `None` when nothing is stored.
    async fn fetch(&self, key: &str) -> Result<Option<LabelSet>, ServiceError>;
}
