//! RDS collector: DB instances, clusters, and parameter/option groups.
//!
//! Parameter and option groups include the provider defaults here; the
//! aggregator's exclusion rules drop them.

use std::collections::BTreeMap;

use async_trait::async_trait;
use aws_sdk_rds::config::Region;
use aws_sdk_rds::types::Tag;
use serde_json::Value;

use awsmap_scanner::{CollectError, Collector, ResourceRecord};

use crate::util::classify;
use crate::AwsContext;

pub struct RdsCollector {
    ctx: AwsContext,
}

impl RdsCollector {
    pub fn new(ctx: AwsContext) -> Self {
        Self { ctx }
    }

    fn client(&self, region: &str) -> aws_sdk_rds::Client {
        let config = aws_sdk_rds::config::Builder::from(&self.ctx.config)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_rds::Client::from_conf(config)
    }
}

fn tag_map(tags: &[Tag]) -> BTreeMap<String, String> {
    tags.iter()
        .filter_map(|t| Some((t.key()?.to_string(), t.value().unwrap_or_default().to_string())))
        .collect()
}

fn opt_value(value: Option<impl Into<Value>>) -> Value {
    value.map(Into::into).unwrap_or(Value::Null)
}

#[async_trait]
impl Collector for RdsCollector {
    fn service(&self) -> &str {
        "rds"
    }

    async fn collect(&self, region: &str) -> Result<Vec<ResourceRecord>, CollectError> {
        let client = self.client(region);
        let mut records = Vec::new();

        let mut pages = client.describe_db_instances().into_paginator().send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| classify(region, e))?;
            for db in page.db_instances() {
                let Some(id) = db.db_instance_identifier() else {
                    continue;
                };
                let mut record = ResourceRecord::new("rds", "db-instance", id, region);
                record.arn = db.db_instance_arn().map(str::to_string);
                record.name = Some(id.to_string());
                record
                    .details
                    .insert("engine".to_string(), opt_value(db.engine().map(str::to_string)));
                record.details.insert(
                    "engine_version".to_string(),
                    opt_value(db.engine_version().map(str::to_string)),
                );
                record.details.insert(
                    "status".to_string(),
                    opt_value(db.db_instance_status().map(str::to_string)),
                );
                record.details.insert(
                    "instance_class".to_string(),
                    opt_value(db.db_instance_class().map(str::to_string)),
                );
                record.details.insert(
                    "allocated_storage_gb".to_string(),
                    Value::from(db.allocated_storage()),
                );
                record.details.insert(
                    "storage_encrypted".to_string(),
                    Value::from(db.storage_encrypted()),
                );
                record.details.insert(
                    "endpoint".to_string(),
                    opt_value(
                        db.endpoint()
                            .and_then(|e| e.address())
                            .map(str::to_string),
                    ),
                );
                record
                    .details
                    .insert("multi_az".to_string(), Value::from(db.multi_az()));
                record.tags = tag_map(db.tag_list());
                records.push(record);
            }
        }

        let mut pages = client.describe_db_clusters().into_paginator().send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| classify(region, e))?;
            for cluster in page.db_clusters() {
                let Some(id) = cluster.db_cluster_identifier() else {
                    continue;
                };
                let mut record = ResourceRecord::new("rds", "db-cluster", id, region);
                record.arn = cluster.db_cluster_arn().map(str::to_string);
                record.name = Some(id.to_string());
                record.details.insert(
                    "engine".to_string(),
                    opt_value(cluster.engine().map(str::to_string)),
                );
                record.details.insert(
                    "status".to_string(),
                    opt_value(cluster.status().map(str::to_string)),
                );
                record.details.insert(
                    "members".to_string(),
                    Value::from(cluster.db_cluster_members().len()),
                );
                record.tags = tag_map(cluster.tag_list());
                records.push(record);
            }
        }

        let mut pages = client.describe_db_parameter_groups().into_paginator().send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| classify(region, e))?;
            for group in page.db_parameter_groups() {
                let Some(name) = group.db_parameter_group_name() else {
                    continue;
                };
                let mut record = ResourceRecord::new("rds", "db-parameter-group", name, region);
                record.arn = group.db_parameter_group_arn().map(str::to_string);
                record.name = Some(name.to_string());
                record.details.insert(
                    "family".to_string(),
                    opt_value(group.db_parameter_group_family().map(str::to_string)),
                );
                record.details.insert(
                    "description".to_string(),
                    opt_value(group.description().map(str::to_string)),
                );
                records.push(record);
            }
        }

        let mut pages = client.describe_option_groups().into_paginator().send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| classify(region, e))?;
            for group in page.option_groups_list() {
                let Some(name) = group.option_group_name() else {
                    continue;
                };
                let mut record = ResourceRecord::new("rds", "option-group", name, region);
                record.arn = group.option_group_arn().map(str::to_string);
                record.name = Some(name.to_string());
                record.details.insert(
                    "engine".to_string(),
                    opt_value(group.engine_name().map(str::to_string)),
                );
                record.details.insert(
                    "description".to_string(),
                    opt_value(group.option_group_description().map(str::to_string)),
                );
                records.push(record);
            }
        }

        Ok(records)
    }
}
