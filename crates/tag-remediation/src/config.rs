//! Handler configuration read from the process environment.

use tracing::warn;

/// Environment variable naming the SSM parameter that holds account-wide default tags.
pub const ENV_DEFAULT_TAGS_PARAMETER: &str = "DEFAULT_TAGS_SSM_PARAMETER";
/// Environment variable with the environment name used as the `Environment` fallback.
pub const ENV_ENVIRONMENT: &str = "ENVIRONMENT";
/// Environment variable with the AWS region.
pub const ENV_AWS_REGION: &str = "AWS_REGION";

pub const DEFAULT_TAGS_PARAMETER: &str = "/baseline/default-tags";
pub const DEFAULT_ENVIRONMENT: &str = "unknown";
pub const DEFAULT_REGION: &str = "eu-west-2";

/// Settings shared by every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// SSM parameter holding a JSON object of default tags
    pub default_tags_parameter: String,
    /// Fallback value for the `Environment` tag
    pub environment: String,
    /// Region used for ARNs and SDK clients
    pub region: String,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            default_tags_parameter: DEFAULT_TAGS_PARAMETER.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            region: DEFAULT_REGION.to_string(),
        }
    }
}

impl HandlerConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// A blank parameter name or region falls back to its default.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let default_tags_parameter = match lookup(ENV_DEFAULT_TAGS_PARAMETER) {
            Some(value) if value.trim().is_empty() => {
                warn!(
                    variable = ENV_DEFAULT_TAGS_PARAMETER,
                    fallback = DEFAULT_TAGS_PARAMETER,
                    "Default tags parameter is blank, using fallback"
                );
                defaults.default_tags_parameter
            }
            Some(value) => value,
            None => defaults.default_tags_parameter,
        };

        let environment = lookup(ENV_ENVIRONMENT).unwrap_or(defaults.environment);

        let region = lookup(ENV_AWS_REGION)
            .filter(|region| !region.trim().is_empty())
            .unwrap_or(defaults.region);

        Self {
            default_tags_parameter,
            environment,
            region,
        }
    }
}
