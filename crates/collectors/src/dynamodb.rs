//! DynamoDB collector: tables.

use std::collections::BTreeMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::config::Region;
use serde_json::Value;

use awsmap_scanner::{CollectError, Collector, ResourceRecord};

use crate::util::classify;
use crate::AwsContext;

pub struct DynamoDbCollector {
    ctx: AwsContext,
}

impl DynamoDbCollector {
    pub fn new(ctx: AwsContext) -> Self {
        Self { ctx }
    }

    fn client(&self, region: &str) -> aws_sdk_dynamodb::Client {
        let config = aws_sdk_dynamodb::config::Builder::from(&self.ctx.config)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_dynamodb::Client::from_conf(config)
    }
}

#[async_trait]
impl Collector for DynamoDbCollector {
    fn service(&self) -> &str {
        "dynamodb"
    }

    async fn collect(&self, region: &str) -> Result<Vec<ResourceRecord>, CollectError> {
        let client = self.client(region);
        let mut records = Vec::new();

        let mut pages = client.list_tables().into_paginator().items().send();
        while let Some(name) = pages.next().await {
            let name = name.map_err(|e| classify(region, e))?;

            let mut record = ResourceRecord::new("dynamodb", "table", &name, region);
            record.name = Some(name.clone());

            // Table details and tags are best-effort enrichment.
            if let Ok(described) = client.describe_table().table_name(&name).send().await {
                if let Some(table) = described.table() {
                    record.arn = table.table_arn().map(str::to_string);
                    record.details.insert(
                        "status".to_string(),
                        table
                            .table_status()
                            .map(|s| Value::from(s.as_str()))
                            .unwrap_or(Value::Null),
                    );
                    record.details.insert(
                        "item_count".to_string(),
                        table.item_count().map(Value::from).unwrap_or(Value::Null),
                    );
                    record.details.insert(
                        "size_bytes".to_string(),
                        table
                            .table_size_bytes()
                            .map(Value::from)
                            .unwrap_or(Value::Null),
                    );
                    record.details.insert(
                        "billing_mode".to_string(),
                        table
                            .billing_mode_summary()
                            .and_then(|b| b.billing_mode())
                            .map(|m| Value::from(m.as_str()))
                            .unwrap_or(Value::Null),
                    );
                }
            }

            if let Some(arn) = record.arn.clone() {
                if let Ok(tagging) = client.list_tags_of_resource().resource_arn(arn).send().await
                {
                    let mut tags: BTreeMap<String, String> = BTreeMap::new();
                    for tag in tagging.tags() {
                        tags.insert(tag.key().to_string(), tag.value().to_string());
                    }
                    record.tags = tags;
                }
            }

            records.push(record);
        }

        Ok(records)
    }
}
