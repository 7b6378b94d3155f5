//! Route 53 collector: hosted zones.

use async_trait::async_trait;
use serde_json::Value;

use awsmap_scanner::{CollectError, Collector, ResourceRecord};

use crate::util::classify;
use crate::AwsContext;

pub struct Route53Collector {
    ctx: AwsContext,
}

impl Route53Collector {
    pub fn new(ctx: AwsContext) -> Self {
        Self { ctx }
    }

    fn client(&self) -> aws_sdk_route53::Client {
        aws_sdk_route53::Client::new(&self.ctx.config)
    }
}

/// Hosted zone ids come prefixed with `/hostedzone/`.
fn zone_id(raw: &str) -> &str {
    raw.rsplit('/').next().unwrap_or(raw)
}

#[async_trait]
impl Collector for Route53Collector {
    fn service(&self) -> &str {
        "route53"
    }

    async fn collect(&self, region: &str) -> Result<Vec<ResourceRecord>, CollectError> {
        let client = self.client();
        let mut records = Vec::new();

        let mut pages = client.list_hosted_zones().into_paginator().items().send();
        while let Some(zone) = pages.next().await {
            let zone = zone.map_err(|e| classify(region, e))?;
            let id = zone_id(zone.id()).to_string();

            let mut record = ResourceRecord::new("route53", "hosted-zone", &id, region);
            record.arn = Some(format!("arn:aws:route53:::hostedzone/{id}"));
            record.name = Some(zone.name().trim_end_matches('.').to_string());
            record.details.insert(
                "record_count".to_string(),
                zone.resource_record_set_count()
                    .map(Value::from)
                    .unwrap_or(Value::Null),
            );
            record.details.insert(
                "private".to_string(),
                zone.config()
                    .map(|c| Value::from(c.private_zone()))
                    .unwrap_or(Value::Null),
            );
            record.details.insert(
                "comment".to_string(),
                zone.config()
                    .and_then(|c| c.comment())
                    .map(Value::from)
                    .unwrap_or(Value::Null),
            );
            records.push(record);
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_id_strips_prefix() {
        assert_eq!(zone_id("/hostedzone/Z0123456789ABC"), "Z0123456789ABC");
        assert_eq!(zone_id("Z0123456789ABC"), "Z0123456789ABC");
    }
}
