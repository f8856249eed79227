//! Which resource kinds can be tagged automatically, and how to name them.

use crate::error::{RemediationError, RemediationResult};

/// Resource kinds the Resource Groups Tagging API can tag.
pub const TAGGABLE_RESOURCES: &[&str] = &[
    "AWS::EC2::Instance",
    "AWS::EC2::Volume",
    "AWS::EC2::Snapshot",
    "AWS::EC2::VPC",
    "AWS::EC2::Subnet",
    "AWS::EC2::SecurityGroup",
    "AWS::RDS::DBInstance",
    "AWS::RDS::DBCluster",
    "AWS::S3::Bucket",
    "AWS::Lambda::Function",
    "AWS::DynamoDB::Table",
    "AWS::ECS::Cluster",
    "AWS::ECS::Service",
    "AWS::EKS::Cluster",
    "AWS::EFS::FileSystem",
];

/// Account and region the ARN is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountContext {
    pub account_id: String,
    pub region: String,
}

/// Check a resource kind against [`TAGGABLE_RESOURCES`].
#[must_use]
pub fn is_taggable(resource_type: &str) -> bool {
    TAGGABLE_RESOURCES.iter().any(|kind| *kind == resource_type)
}

/// Build the ARN for a resource.
///
/// `AWS::ECS::Service` is taggable but its ARN needs the cluster name, which
/// the event does not carry, so it has no template.
pub fn resource_arn(
    resource_type: &str,
    resource_id: &str,
    account: &AccountContext,
) -> RemediationResult<String> {
    let AccountContext { account_id, region } = account;
    let id = resource_id;

    let arn = match resource_type {
        "AWS::EC2::Instance" => format!("arn:aws:ec2:{region}:{account_id}:instance/{id}"),
        "AWS::EC2::Volume" => format!("arn:aws:ec2:{region}:{account_id}:volume/{id}"),
        "AWS::EC2::Snapshot" => format!("arn:aws:ec2:{region}:{account_id}:snapshot/{id}"),
        "AWS::EC2::VPC" => format!("arn:aws:ec2:{region}:{account_id}:vpc/{id}"),
        "AWS::EC2::Subnet" => format!("arn:aws:ec2:{region}:{account_id}:subnet/{id}"),
        "AWS::EC2::SecurityGroup" => {
            format!("arn:aws:ec2:{region}:{account_id}:security-group/{id}")
        }
        "AWS::RDS::DBInstance" => format!("arn:aws:rds:{region}:{account_id}:db:{id}"),
        "AWS::RDS::DBCluster" => format!("arn:aws:rds:{region}:{account_id}:cluster:{id}"),
        "AWS::S3::Bucket" => format!("arn:aws:s3:::{id}"),
        "AWS::Lambda::Function" => {
            format!("arn:aws:lambda:{region}:{account_id}:function:{id}")
        }
        "AWS::DynamoDB::Table" => format!("arn:aws:dynamodb:{region}:{account_id}:table/{id}"),
        "AWS::ECS::Cluster" => format!("arn:aws:ecs:{region}:{account_id}:cluster/{id}"),
        "AWS::EKS::Cluster" => format!("arn:aws:eks:{region}:{account_id}:cluster/{id}"),
        "AWS::EFS::FileSystem" => {
            format!("arn:aws:elasticfilesystem:{region}:{account_id}:file-system/{id}")
        }
        _ => {
            return Err(RemediationError::UnsupportedIdentifier {
                resource_type: resource_type.to_string(),
                resource_id: resource_id.to_string(),
            })
        }
    };

    Ok(arn)
}
