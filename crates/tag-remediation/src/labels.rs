//! Default tag generation and the non-overwriting merge.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::warn;

/// Tag key to tag value.
pub type LabelSet = BTreeMap<String, String>;

/// Prefix of the Config rules that check for a required tag.
pub const RULE_PREFIX: &str = "required-tag-";

pub const ENVIRONMENT_KEY: &str = "Environment";
pub const OWNER_KEY: &str = "Owner";
pub const COST_CENTER_KEY: &str = "CostCenter";
pub const DATA_CLASSIFICATION_KEY: &str = "DataClassification";

pub const AUTO_TAGGED_BY_KEY: &str = "AutoTaggedBy";
pub const AUTO_TAGGED_DATE_KEY: &str = "AutoTaggedDate";
pub const AUTO_TAGGED_BY_VALUE: &str = "baseline-remediation";

const DEFAULT_OWNER: &str = "platform-team";
const DEFAULT_COST_CENTER: &str = "engineering";
const DEFAULT_DATA_CLASSIFICATION: &str = "internal";

/// Provenance keys are rewritten on every remediation.
pub const PROVENANCE_KEYS: [&str; 2] = [AUTO_TAGGED_BY_KEY, AUTO_TAGGED_DATE_KEY];

/// Derive the tag key a rule checks for.
///
/// `required-tag-environment` becomes `Environment`. Only the first character
/// is upper-cased and the rest lower-cased, so `required-tag-cost-center`
/// becomes `Cost-center`. A name without the prefix yields an empty key.
#[must_use]
pub fn missing_tag_from_rule_name(rule_name: Option<&str>) -> String {
    let Some(rule_name) = rule_name.filter(|name| name.starts_with(RULE_PREFIX)) else {
        warn!(
            rule_name = rule_name.unwrap_or_default(),
            "Config rule name does not follow the required-tag- convention"
        );
        return String::new();
    };

    capitalize(&rule_name.replace(RULE_PREFIX, ""))
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Layered defaults: account overrides, then static fallbacks, then provenance.
#[derive(Debug, Clone)]
pub struct DefaultTagPolicy {
    environment: String,
}

impl DefaultTagPolicy {
    /// `environment` is the fallback for the `Environment` tag.
    #[must_use]
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
        }
    }

    fn fallbacks(&self) -> [(&'static str, &str); 4] {
        [
            (ENVIRONMENT_KEY, self.environment.as_str()),
            (OWNER_KEY, DEFAULT_OWNER),
            (COST_CENTER_KEY, DEFAULT_COST_CENTER),
            (DATA_CLASSIFICATION_KEY, DEFAULT_DATA_CLASSIFICATION),
        ]
    }

    /// Compute the candidate tags for a resource remediated on `today`.
    ///
    /// `overrides` is the account-wide default set, or `None` when it could
    /// not be fetched.
    #[must_use]
    pub fn generate(&self, overrides: Option<&LabelSet>, today: NaiveDate) -> LabelSet {
        let mut tags = overrides.cloned().unwrap_or_default();

        for (key, value) in self.fallbacks() {
            tags.entry(key.to_string())
                .or_insert_with(|| value.to_string());
        }

        tags.insert(
            AUTO_TAGGED_BY_KEY.to_string(),
            AUTO_TAGGED_BY_VALUE.to_string(),
        );
        tags.insert(
            AUTO_TAGGED_DATE_KEY.to_string(),
            today.format("%Y-%m-%d").to_string(),
        );

        tags
    }
}

/// Tags from `defaults` whose key the resource does not carry yet.
#[must_use]
pub fn tags_to_apply(defaults: &LabelSet, current: &LabelSet) -> LabelSet {
    defaults
        .iter()
        .filter(|(key, _)| !current.contains_key(*key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
