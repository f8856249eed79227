//! AWS SDK implementations of the collaborator traits.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_resourcegroupstagging as tagging;
use aws_sdk_ssm as ssm;
use ssm::operation::get_parameter::GetParameterOutput;
use tagging::operation::tag_resources::TagResourcesOutput;
use aws_sdk_sts as sts;
use serde_json::Value;
use tracing::{debug, warn};

use crate::clients::{DefaultTagSource, IdentityResolver, TagStore};
use crate::error::ServiceError;
use crate::labels::LabelSet;
use crate::resources::AccountContext;

/// Load the shared SDK configuration pinned to `region`.
pub async fn load_sdk_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}

/// Account id from STS `GetCallerIdentity`; region from configuration.
pub struct StsIdentityResolver {
    client: sts::Client,
    region: String,
}

impl StsIdentityResolver {
    #[must_use]
    pub fn new(sdk_config: &SdkConfig, region: impl Into<String>) -> Self {
        Self {
            client: sts::Client::new(sdk_config),
            region: region.into(),
        }
    }
}

#[async_trait]
impl IdentityResolver for StsIdentityResolver {
    async fn resolve(&self) -> Result<AccountContext, ServiceError> {
        let identity = self
            .client
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| ServiceError::new("sts", sts::error::DisplayErrorContext(&e).to_string()))?;

        let account_id = identity
            .account()
            .filter(|account| !account.is_empty())
            .ok_or_else(|| ServiceError::new("sts", "caller identity has no account id"))?;

        Ok(AccountContext {
            account_id: account_id.to_string(),
            region: self.region.clone(),
        })
    }
}

/// Tags through the Resource Groups Tagging API.
pub struct TaggingApiStore {
    client: tagging::Client,
}

impl TaggingApiStore {
    #[must_use]
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: tagging::Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl TagStore for TaggingApiStore {
    async fn get_tags(&self, arn: &str) -> Result<Option<LabelSet>, ServiceError> {
        let output = self
            .client
            .get_resources()
            .resource_arn_list(arn)
            .send()
            .await
            .map_err(|e| {
                ServiceError::new("tagging", tagging::error::DisplayErrorContext(&e).to_string())
            })?;

        // Unknown resources come back as an empty mapping list rather than an error.
        let Some(mapping) = output.resource_tag_mapping_list().first() else {
            debug!(arn, "Tagging API has no record of resource");
            return Ok(None);
        };

        Ok(Some(
            mapping
                .tags()
                .iter()
                .map(|tag| (tag.key().to_string(), tag.value().to_string()))
                .collect(),
        ))
    }

    async fn apply_tags(&self, arn: &str, tags: &LabelSet) -> Result<(), ServiceError> {
        let tags: HashMap<String, String> = tags
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let output = self
            .client
            .tag_resources()
            .resource_arn_list(arn)
            .set_tags(Some(tags))
            .send()
            .await
            .map_err(|e| {
                ServiceError::new("tagging", tagging::error::DisplayErrorContext(&e).to_string())
            })?;

        check_tag_failures(&output, arn)
    }
}

/// TagResources reports per-resource failures in the body of a successful call.
pub fn check_tag_failures(output: &TagResourcesOutput, arn: &str) -> Result<(), ServiceError> {
    let Some(failure) = output
        .failed_resources_map()
        .and_then(|failures| failures.get(arn))
    else {
        return Ok(());
    };

    Err(ServiceError::new(
        "tagging",
        format!(
            "{}: {}",
            failure
                .error_code()
                .map_or("Unknown", |code| code.as_str()),
            failure.error_message().unwrap_or("no error message"),
        ),
    ))
}

/// Account-wide default tags stored as a JSON object in an SSM parameter.
pub struct SsmDefaultTags {
    client: ssm::Client,
}

impl SsmDefaultTags {
    #[must_use]
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: ssm::Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl DefaultTagSource for SsmDefaultTags {
    async fn fetch(&self, key: &str) -> Result<Option<LabelSet>, ServiceError> {
        let result = self
            .client
            .get_parameter()
            .name(key)
            .send()
            .await
            .map_err(ssm::Error::from);
        default_tags_from(result)
    }
}

/// Map a `GetParameter` result to the override tags; a missing parameter is `None`.
pub fn default_tags_from(
    result: Result<GetParameterOutput, ssm::Error>,
) -> Result<Option<LabelSet>, ServiceError> {
    let output = match result {
        Ok(output) => output,
        Err(ssm::Error::ParameterNotFound(_)) => return Ok(None),
        Err(e) => {
            return Err(ServiceError::new(
                "ssm",
                ssm::error::DisplayErrorContext(&e).to_string(),
            ))
        }
    };

    let Some(raw) = output.parameter().and_then(|parameter| parameter.value()) else {
        return Ok(None);
    };

    parse_default_tags(raw).map(Some)
}

/// Decode the parameter value: a JSON object of tag key to value.
///
/// Numbers and booleans are stringified; other value types are skipped.
pub fn parse_default_tags(raw: &str) -> Result<LabelSet, ServiceError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| ServiceError::new("ssm", format!("default tags are not valid JSON: {e}")))?;

    let Value::Object(entries) = value else {
        return Err(ServiceError::new("ssm", "default tags must be a JSON object"));
    };

    let mut tags = LabelSet::new();
    for (key, value) in entries {
        let value = match value {
            Value::String(value) => value,
            Value::Number(number) => number.to_string(),
            Value::Bool(flag) => flag.to_string(),
            other => {
                warn!(key = %key, value = %other, "Skipping default tag with non-scalar value");
                continue;
            }
        };
        tags.insert(key, value);
    }
    Ok(tags)
}
