//! SQS collector: queues.

use async_trait::async_trait;
use aws_sdk_sqs::config::Region;
use aws_sdk_sqs::types::QueueAttributeName;
use serde_json::Value;

use awsmap_scanner::{CollectError, Collector, ResourceRecord};

use crate::util::classify;
use crate::AwsContext;

pub struct SqsCollector {
    ctx: AwsContext,
}

impl SqsCollector {
    pub fn new(ctx: AwsContext) -> Self {
        Self { ctx }
    }

    fn client(&self, region: &str) -> aws_sdk_sqs::Client {
        let config = aws_sdk_sqs::config::Builder::from(&self.ctx.config)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_sqs::Client::from_conf(config)
    }
}

/// The queue name is the trailing path segment of its URL.
fn queue_name(url: &str) -> String {
    url.rsplit('/').next().unwrap_or(url).to_string()
}

#[async_trait]
impl Collector for SqsCollector {
    fn service(&self) -> &str {
        "sqs"
    }

    async fn collect(&self, region: &str) -> Result<Vec<ResourceRecord>, CollectError> {
        let client = self.client(region);
        let mut records = Vec::new();

        let mut pages = client.list_queues().into_paginator().items().send();
        while let Some(url) = pages.next().await {
            let url = url.map_err(|e| classify(region, e))?;
            let name = queue_name(&url);

            let mut record = ResourceRecord::new("sqs", "queue", &name, region);
            record.name = Some(name.clone());
            record
                .details
                .insert("url".to_string(), Value::from(url.clone()));

            if let Ok(attributes) = client
                .get_queue_attributes()
                .queue_url(&url)
                .attribute_names(QueueAttributeName::QueueArn)
                .attribute_names(QueueAttributeName::ApproximateNumberOfMessages)
                .attribute_names(QueueAttributeName::FifoQueue)
                .send()
                .await
            {
                if let Some(map) = attributes.attributes() {
                    record.arn = map.get(&QueueAttributeName::QueueArn).cloned();
                    if let Some(depth) = map.get(&QueueAttributeName::ApproximateNumberOfMessages)
                    {
                        record
                            .details
                            .insert("approximate_messages".to_string(), Value::from(depth.clone()));
                    }
                    if let Some(fifo) = map.get(&QueueAttributeName::FifoQueue) {
                        record
                            .details
                            .insert("fifo".to_string(), Value::from(fifo == "true"));
                    }
                }
            }

            if let Ok(tagging) = client.list_queue_tags().queue_url(&url).send().await {
                if let Some(tags) = tagging.tags() {
                    record.tags = tags.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
                }
            }

            records.push(record);
        }

        Ok(records)
    }
}
