//! Global Accelerator collector: accelerators.
//!
//! The service is global with its control plane in us-west-2; the scheduler
//! always hands this collector that region.

use std::collections::BTreeMap;

use async_trait::async_trait;
use aws_sdk_globalaccelerator::config::Region;
use serde_json::Value;

use awsmap_scanner::{CollectError, Collector, ResourceRecord};

use crate::util::{arn_name, classify};
use crate::AwsContext;

pub struct GlobalAcceleratorCollector {
    ctx: AwsContext,
}

impl GlobalAcceleratorCollector {
    pub fn new(ctx: AwsContext) -> Self {
        Self { ctx }
    }

    fn client(&self, region: &str) -> aws_sdk_globalaccelerator::Client {
        let config = aws_sdk_globalaccelerator::config::Builder::from(&self.ctx.config)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_globalaccelerator::Client::from_conf(config)
    }
}

#[async_trait]
impl Collector for GlobalAcceleratorCollector {
    fn service(&self) -> &str {
        "globalaccelerator"
    }

    async fn collect(&self, region: &str) -> Result<Vec<ResourceRecord>, CollectError> {
        let client = self.client(region);
        let mut records = Vec::new();

        let mut pages = client.list_accelerators().into_paginator().items().send();
        while let Some(accelerator) = pages.next().await {
            let accelerator = accelerator.map_err(|e| classify(region, e))?;
            let Some(arn) = accelerator.accelerator_arn() else {
                continue;
            };

            let mut record =
                ResourceRecord::new("globalaccelerator", "accelerator", arn_name(arn), region);
            record.arn = Some(arn.to_string());
            record.name = accelerator.name().map(str::to_string);
            record.details.insert(
                "status".to_string(),
                accelerator
                    .status()
                    .map(|s| Value::from(s.as_str()))
                    .unwrap_or(Value::Null),
            );
            record.details.insert(
                "enabled".to_string(),
                accelerator.enabled().map(Value::from).unwrap_or(Value::Null),
            );
            record.details.insert(
                "dns_name".to_string(),
                accelerator.dns_name().map(Value::from).unwrap_or(Value::Null),
            );

            if let Ok(tagging) = client.list_tags_for_resource().resource_arn(arn).send().await
            {
                let mut tags: BTreeMap<String, String> = BTreeMap::new();
                for tag in tagging.tags() {
                    tags.insert(tag.key().to_string(), tag.value().to_string());
                }
                record.tags = tags;
            }

            records.push(record);
        }

        Ok(records)
    }
}
