//! CloudFront collector: distributions.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use awsmap_scanner::{CollectError, Collector, ResourceRecord};

use crate::util::classify;
use crate::AwsContext;

pub struct CloudFrontCollector {
    ctx: AwsContext,
}

impl CloudFrontCollector {
    pub fn new(ctx: AwsContext) -> Self {
        Self { ctx }
    }

    fn client(&self) -> aws_sdk_cloudfront::Client {
        aws_sdk_cloudfront::Client::new(&self.ctx.config)
    }
}

#[async_trait]
impl Collector for CloudFrontCollector {
    fn service(&self) -> &str {
        "cloudfront"
    }

    async fn collect(&self, region: &str) -> Result<Vec<ResourceRecord>, CollectError> {
        let client = self.client();
        let mut records = Vec::new();

        let mut pages = client.list_distributions().into_paginator().send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| classify(region, e))?;
            let Some(list) = page.distribution_list() else {
                continue;
            };
            for distribution in list.items() {
                let id = distribution.id();
                let mut record = ResourceRecord::new("cloudfront", "distribution", id, region);
                record.arn = Some(distribution.arn().to_string());
                record.name = Some(distribution.domain_name().to_string());
                record
                    .details
                    .insert("status".to_string(), Value::from(distribution.status()));
                record
                    .details
                    .insert("enabled".to_string(), Value::from(distribution.enabled()));
                record.details.insert(
                    "comment".to_string(),
                    Value::from(distribution.comment()),
                );
                record.details.insert(
                    "aliases".to_string(),
                    Value::from(distribution.aliases().items().to_vec()),
                );

                if let Ok(tagging) = client
                    .list_tags_for_resource()
                    .resource(distribution.arn())
                    .send()
                    .await
                {
                    let mut tags: BTreeMap<String, String> = BTreeMap::new();
                    for tag in tagging.tags().items() {
                        tags.insert(
                            tag.key().to_string(),
                            tag.value().unwrap_or_default().to_string(),
                        );
                    }
                    record.tags = tags;
                }

                records.push(record);
            }
        }

        Ok(records)
    }
}
