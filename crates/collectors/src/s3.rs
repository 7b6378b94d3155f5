//! S3 collector: buckets.
//!
//! Bucket listing is account-wide, but every bucket has a home region the
//! provider reports per bucket; records carry that region, not the scan
//! region. Per-bucket detail lookups are best-effort: a bucket with no tag
//! set or a denied `GetBucketVersioning` still produces a record.

use std::collections::BTreeMap;

use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use serde_json::Value;

use awsmap_scanner::{CollectError, Collector, ResourceRecord};

use crate::util::classify;
use crate::AwsContext;

pub struct S3Collector {
    ctx: AwsContext,
}

impl S3Collector {
    pub fn new(ctx: AwsContext) -> Self {
        Self { ctx }
    }

    fn client(&self, region: &str) -> aws_sdk_s3::Client {
        let config = aws_sdk_s3::config::Builder::from(&self.ctx.config)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_s3::Client::from_conf(config)
    }
}

#[async_trait]
impl Collector for S3Collector {
    fn service(&self) -> &str {
        "s3"
    }

    async fn collect(&self, region: &str) -> Result<Vec<ResourceRecord>, CollectError> {
        let client = self.client(region);
        let listing = client
            .list_buckets()
            .send()
            .await
            .map_err(|e| classify(region, e))?;

        let mut records = Vec::new();
        for bucket in listing.buckets() {
            let Some(name) = bucket.name() else {
                continue;
            };

            // An empty location constraint means us-east-1.
            let bucket_region = match client.get_bucket_location().bucket(name).send().await {
                Ok(location) => location
                    .location_constraint()
                    .map(|c| c.as_str().to_string())
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| "us-east-1".to_string()),
                Err(err) => {
                    tracing::debug!(bucket = %name, error = %err, "bucket location unavailable");
                    "us-east-1".to_string()
                }
            };

            let mut tags: BTreeMap<String, String> = BTreeMap::new();
            if let Ok(tagging) = client.get_bucket_tagging().bucket(name).send().await {
                for tag in tagging.tag_set() {
                    tags.insert(tag.key().to_string(), tag.value().to_string());
                }
            }

            let versioning = match client.get_bucket_versioning().bucket(name).send().await {
                Ok(output) => output
                    .status()
                    .map(|s| Value::from(s.as_str()))
                    .unwrap_or(Value::Null),
                Err(_) => Value::Null,
            };

            let encryption = match client.get_bucket_encryption().bucket(name).send().await {
                Ok(output) => output
                    .server_side_encryption_configuration()
                    .and_then(|config| config.rules().first().cloned())
                    .and_then(|rule| rule.apply_server_side_encryption_by_default().cloned())
                    .map(|default| Value::from(default.sse_algorithm().as_str()))
                    .unwrap_or(Value::Null),
                Err(_) => Value::Null,
            };

            let mut record = ResourceRecord::new("s3", "bucket", name, &bucket_region);
            record.arn = Some(format!("arn:aws:s3:::{name}"));
            record.name = Some(name.to_string());
            record.details.insert(
                "creation_date".to_string(),
                bucket
                    .creation_date()
                    .map(|d| Value::from(d.to_string()))
                    .unwrap_or(Value::Null),
            );
            record.details.insert("versioning".to_string(), versioning);
            record.details.insert("encryption".to_string(), encryption);
            record.tags = tags;
            records.push(record);
        }

        Ok(records)
    }
}
