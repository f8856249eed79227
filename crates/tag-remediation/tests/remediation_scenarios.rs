//! End-to-end remediation scenarios against in-memory collaborators.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use notify::{ChannelError, Notifier, NotifyChannel, NotifyEvent};
use serde_json::{json, Value};

use tag_remediation::clients::{DefaultTagSource, IdentityResolver, TagStore};
use tag_remediation::resources::AccountContext;
use tag_remediation::{HandlerConfig, LabelSet, RemediationHandler, ServiceError};

struct FixedIdentity;

#[async_trait]
impl IdentityResolver for FixedIdentity {
    async fn resolve(&self) -> Result<AccountContext, ServiceError> {
        Ok(AccountContext {
            account_id: "123456789012".to_string(),
            region: "eu-west-2".to_string(),
        })
    }
}

/// A tag store that remembers writes, like the real tagging API.
#[derive(Default)]
struct InMemoryTagStore {
    resources: Mutex<HashMap<String, LabelSet>>,
    apply_calls: Mutex<usize>,
}

impl InMemoryTagStore {
    fn with_resource(arn: &str, tags: &[(&str, &str)]) -> Self {
        let store = Self::default();
        store.resources.lock().unwrap().insert(
            arn.to_string(),
            tags.iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        );
        store
    }

    fn tags(&self, arn: &str) -> LabelSet {
        self.resources
            .lock()
            .unwrap()
            .get(arn)
            .cloned()
            .unwrap_or_default()
    }

    fn apply_calls(&self) -> usize {
        *self.apply_calls.lock().unwrap()
    }
}

#[async_trait]
impl TagStore for InMemoryTagStore {
    async fn get_tags(&self, arn: &str) -> Result<Option<LabelSet>, ServiceError> {
        Ok(self.resources.lock().unwrap().get(arn).cloned())
    }

    async fn apply_tags(&self, arn: &str, tags: &LabelSet) -> Result<(), ServiceError> {
        *self.apply_calls.lock().unwrap() += 1;
        self.resources
            .lock()
            .unwrap()
            .entry(arn.to_string())
            .or_default()
            .extend(tags.clone());
        Ok(())
    }
}

struct StaticDefaults(Option<LabelSet>);

#[async_trait]
impl DefaultTagSource for StaticDefaults {
    async fn fetch(&self, _key: &str) -> Result<Option<LabelSet>, ServiceError> {
        Ok(self.0.clone())
    }
}

#[derive(Default)]
struct Inbox {
    events: Mutex<Vec<NotifyEvent>>,
}

#[async_trait]
impl NotifyChannel for Inbox {
    fn name(&self) -> &'static str {
        "inbox"
    }

    fn enabled(&self) -> bool {
        true
    }

    async fn send(&self, event: &NotifyEvent) -> Result<(), ChannelError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

struct Harness {
    handler: RemediationHandler,
    store: Arc<InMemoryTagStore>,
    inbox: Arc<Inbox>,
}

fn harness(store: InMemoryTagStore) -> Harness {
    let store = Arc::new(store);
    let inbox = Arc::new(Inbox::default());
    let handler = RemediationHandler::new(
        HandlerConfig {
            environment: "staging".to_string(),
            ..HandlerConfig::default()
        },
        Arc::new(FixedIdentity),
        store.clone(),
        Arc::new(StaticDefaults(None)),
        Notifier::with_channels(vec![inbox.clone() as Arc<dyn NotifyChannel>]),
    );
    Harness {
        handler,
        store,
        inbox,
    }
}

fn bucket_event(compliance_type: &str, resource_type: &str, resource_id: &str) -> Value {
    json!({ "newEvaluationResult": {
        "complianceType": compliance_type,
        "evaluationResultIdentifier": { "evaluationResultQualifier": {
            "configRuleName": "required-tag-costcenter",
            "resourceType": resource_type,
            "resourceId": resource_id
        } }
    } })
}

const BUCKET_ARN: &str = "arn:aws:s3:::my-bucket";

#[tokio::test]
async fn untagged_bucket_receives_all_defaults() {
    let h = harness(InMemoryTagStore::default());

    let response = h
        .handler
        .handle(&bucket_event("NON_COMPLIANT", "AWS::S3::Bucket", "my-bucket"))
        .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body.resource.as_deref(), Some(BUCKET_ARN));
    let tags = h.store.tags(BUCKET_ARN);
    let keys: Vec<_> = tags.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        [
            "AutoTaggedBy",
            "AutoTaggedDate",
            "CostCenter",
            "DataClassification",
            "Environment",
            "Owner"
        ]
    );
    assert_eq!(tags["Environment"], "staging");
    assert!(h.inbox.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn existing_cost_center_survives() {
    let h = harness(InMemoryTagStore::with_resource(
        BUCKET_ARN,
        &[("CostCenter", "finance")],
    ));

    let response = h
        .handler
        .handle(&bucket_event("NON_COMPLIANT", "AWS::S3::Bucket", "my-bucket"))
        .await;

    assert_eq!(response.status_code, 200);
    assert!(!response.applied_keys().contains(&"CostCenter"));
    assert_eq!(h.store.tags(BUCKET_ARN)["CostCenter"], "finance");
}

#[tokio::test]
async fn second_invocation_is_a_no_op() {
    let h = harness(InMemoryTagStore::default());
    let event = bucket_event("NON_COMPLIANT", "AWS::S3::Bucket", "my-bucket");

    let first = h.handler.handle(&event).await;
    let after_first = h.store.tags(BUCKET_ARN);
    let second = h.handler.handle(&event).await;

    assert_eq!(first.body.message, "Tags applied successfully");
    assert_eq!(second.status_code, 200);
    assert_eq!(second.body.message, "No tags needed");
    assert_eq!(h.store.apply_calls(), 1);
    assert_eq!(h.store.tags(BUCKET_ARN), after_first);
}

#[tokio::test]
async fn parameter_group_goes_to_a_human() {
    let h = harness(InMemoryTagStore::default());

    let response = h
        .handler
        .handle(&bucket_event(
            "NON_COMPLIANT",
            "AWS::RDS::DBParameterGroup",
            "default.postgres16",
        ))
        .await;

    assert_eq!(response.status_code, 200);
    assert_eq!(h.store.apply_calls(), 0);
    let events = h.inbox.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].subject(),
        "Manual Tagging Required: AWS::RDS::DBParameterGroup"
    );
    assert_eq!(events[0].resource_id(), "default.postgres16");
}

#[tokio::test]
async fn non_compliant_only() {
    let h = harness(InMemoryTagStore::default());

    for compliance_type in ["COMPLIANT", "NOT_APPLICABLE", "INSUFFICIENT_DATA"] {
        let response = h
            .handler
            .handle(&bucket_event(compliance_type, "AWS::S3::Bucket", "my-bucket"))
            .await;
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body.message, "Resource compliant");
    }

    assert_eq!(h.store.apply_calls(), 0);
    assert!(h.store.tags(BUCKET_ARN).is_empty());
    assert!(h.inbox.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn eventbridge_envelope_is_accepted() {
    let h = harness(InMemoryTagStore::default());
    let payload = json!({
        "source": "aws.config",
        "detail-type": "Config Rules Compliance Change",
        "detail": bucket_event("NON_COMPLIANT", "AWS::EC2::Instance", "i-1234567890abcdef0")
    });

    let response = h.handler.handle(&payload).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(
        response.body.resource.as_deref(),
        Some("arn:aws:ec2:eu-west-2:123456789012:instance/i-1234567890abcdef0")
    );
}

#[tokio::test]
async fn garbage_is_a_bad_request() {
    let h = harness(InMemoryTagStore::default());

    let response = h.handler.handle(&json!("not an event")).await;

    assert_eq!(response.status_code, 400);
    assert_eq!(h.store.apply_calls(), 0);
}
