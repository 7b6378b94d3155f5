//! IAM collector: users, roles, and customer-managed policies.
//!
//! IAM is global; the scheduler always invokes it with the control-plane
//! region and the records are attributed there.

use std::collections::BTreeMap;

use async_trait::async_trait;
use aws_sdk_iam::types::{PolicyScopeType, Tag};
use serde_json::Value;

use awsmap_scanner::{CollectError, Collector, ResourceRecord};

use crate::util::classify;
use crate::AwsContext;

pub struct IamCollector {
    ctx: AwsContext,
}

impl IamCollector {
    pub fn new(ctx: AwsContext) -> Self {
        Self { ctx }
    }

    fn client(&self) -> aws_sdk_iam::Client {
        aws_sdk_iam::Client::new(&self.ctx.config)
    }
}

fn tag_map(tags: &[Tag]) -> BTreeMap<String, String> {
    tags.iter()
        .map(|t| (t.key().to_string(), t.value().to_string()))
        .collect()
}

#[async_trait]
impl Collector for IamCollector {
    fn service(&self) -> &str {
        "iam"
    }

    async fn collect(&self, region: &str) -> Result<Vec<ResourceRecord>, CollectError> {
        let client = self.client();
        let mut records = Vec::new();

        let mut pages = client.list_users().into_paginator().items().send();
        while let Some(user) = pages.next().await {
            let user = user.map_err(|e| classify(region, e))?;
            let mut record = ResourceRecord::new("iam", "user", user.user_name(), region);
            record.arn = Some(user.arn().to_string());
            record.name = Some(user.user_name().to_string());
            record
                .details
                .insert("path".to_string(), Value::from(user.path()));
            record.details.insert(
                "create_date".to_string(),
                Value::from(user.create_date().to_string()),
            );
            record.details.insert(
                "password_last_used".to_string(),
                user.password_last_used()
                    .map(|d| Value::from(d.to_string()))
                    .unwrap_or(Value::Null),
            );
            record.tags = tag_map(user.tags());
            records.push(record);
        }

        let mut pages = client.list_roles().into_paginator().items().send();
        while let Some(role) = pages.next().await {
            let role = role.map_err(|e| classify(region, e))?;
            let mut record = ResourceRecord::new("iam", "role", role.role_name(), region);
            record.arn = Some(role.arn().to_string());
            record.name = Some(role.role_name().to_string());
            record
                .details
                .insert("path".to_string(), Value::from(role.path()));
            record.details.insert(
                "create_date".to_string(),
                Value::from(role.create_date().to_string()),
            );
            record.details.insert(
                "description".to_string(),
                role.description().map(Value::from).unwrap_or(Value::Null),
            );
            record.details.insert(
                "max_session_duration".to_string(),
                role.max_session_duration()
                    .map(Value::from)
                    .unwrap_or(Value::Null),
            );
            record.tags = tag_map(role.tags());
            records.push(record);
        }

        let mut pages = client
            .list_policies()
            .scope(PolicyScopeType::Local)
            .into_paginator()
            .items()
            .send();
        while let Some(policy) = pages.next().await {
            let policy = policy.map_err(|e| classify(region, e))?;
            let Some(name) = policy.policy_name() else {
                continue;
            };
            let mut record = ResourceRecord::new("iam", "policy", name, region);
            record.arn = policy.arn().map(str::to_string);
            record.name = Some(name.to_string());
            record.details.insert(
                "attachment_count".to_string(),
                policy
                    .attachment_count()
                    .map(Value::from)
                    .unwrap_or(Value::Null),
            );
            record.details.insert(
                "default_version".to_string(),
                policy
                    .default_version_id()
                    .map(Value::from)
                    .unwrap_or(Value::Null),
            );
            record.tags = tag_map(policy.tags());
            records.push(record);
        }

        Ok(records)
    }
}
