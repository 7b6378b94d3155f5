//! SNS collector: topics.

use std::collections::BTreeMap;

use async_trait::async_trait;
use aws_sdk_sns::config::Region;

use awsmap_scanner::{CollectError, Collector, ResourceRecord};

use crate::util::{arn_name, classify};
use crate::AwsContext;

pub struct SnsCollector {
    ctx: AwsContext,
}

impl SnsCollector {
    pub fn new(ctx: AwsContext) -> Self {
        Self { ctx }
    }

    fn client(&self, region: &str) -> aws_sdk_sns::Client {
        let config = aws_sdk_sns::config::Builder::from(&self.ctx.config)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_sns::Client::from_conf(config)
    }
}

#[async_trait]
impl Collector for SnsCollector {
    fn service(&self) -> &str {
        "sns"
    }

    async fn collect(&self, region: &str) -> Result<Vec<ResourceRecord>, CollectError> {
        let client = self.client(region);
        let mut records = Vec::new();

        let mut pages = client.list_topics().into_paginator().items().send();
        while let Some(topic) = pages.next().await {
            let topic = topic.map_err(|e| classify(region, e))?;
            let Some(arn) = topic.topic_arn() else {
                continue;
            };
            let name = arn_name(arn);

            let mut record = ResourceRecord::new("sns", "topic", &name, region);
            record.arn = Some(arn.to_string());
            record.name = Some(name.clone());

            if let Ok(tagging) = client.list_tags_for_resource().resource_arn(arn).send().await {
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
