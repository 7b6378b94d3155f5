//! Lambda collector: functions.

use async_trait::async_trait;
use aws_sdk_lambda::config::Region;
use serde_json::Value;

use awsmap_scanner::{CollectError, Collector, ResourceRecord};

use crate::util::classify;
use crate::AwsContext;

pub struct LambdaCollector {
    ctx: AwsContext,
}

impl LambdaCollector {
    pub fn new(ctx: AwsContext) -> Self {
        Self { ctx }
    }

    fn client(&self, region: &str) -> aws_sdk_lambda::Client {
        let config = aws_sdk_lambda::config::Builder::from(&self.ctx.config)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_lambda::Client::from_conf(config)
    }
}

#[async_trait]
impl Collector for LambdaCollector {
    fn service(&self) -> &str {
        "lambda"
    }

    async fn collect(&self, region: &str) -> Result<Vec<ResourceRecord>, CollectError> {
        let client = self.client(region);
        let mut records = Vec::new();

        let mut pages = client.list_functions().into_paginator().items().send();
        while let Some(function) = pages.next().await {
            let function = function.map_err(|e| classify(region, e))?;
            let Some(name) = function.function_name() else {
                continue;
            };

            let mut record = ResourceRecord::new("lambda", "function", name, region);
            record.arn = function.function_arn().map(str::to_string);
            record.name = Some(name.to_string());
            record.details.insert(
                "runtime".to_string(),
                function
                    .runtime()
                    .map(|r| Value::from(r.as_str()))
                    .unwrap_or(Value::Null),
            );
            record.details.insert(
                "memory_mb".to_string(),
                function.memory_size().map(Value::from).unwrap_or(Value::Null),
            );
            record.details.insert(
                "timeout_seconds".to_string(),
                function.timeout().map(Value::from).unwrap_or(Value::Null),
            );
            record.details.insert(
                "code_size_bytes".to_string(),
                Value::from(function.code_size()),
            );
            record.details.insert(
                "last_modified".to_string(),
                function
                    .last_modified()
                    .map(Value::from)
                    .unwrap_or(Value::Null),
            );

            // Function tags come from a separate call; missing permission
            // degrades to an untagged record.
            if let Some(arn) = function.function_arn() {
                if let Ok(tagging) = client.list_tags().resource(arn).send().await {
                    if let Some(tags) = tagging.tags() {
                        record.tags = tags
                            .iter()
                            .map(|(k, v)| (k.clone(), v.clone()))
                            .collect();
                    }
                }
            }

            records.push(record);
        }

        Ok(records)
    }
}
