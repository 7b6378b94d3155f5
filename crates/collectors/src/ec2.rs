//! EC2 collector: instances, EBS volumes, snapshots, and security groups.

use std::collections::BTreeMap;

use async_trait::async_trait;
use aws_sdk_ec2::config::Region;
use aws_sdk_ec2::types::Tag;
use serde_json::{json, Value};

use awsmap_scanner::{CollectError, Collector, ResourceRecord};

use crate::util::classify;
use crate::AwsContext;

pub struct Ec2Collector {
    ctx: AwsContext,
}

impl Ec2Collector {
    pub fn new(ctx: AwsContext) -> Self {
        Self { ctx }
    }

    fn client(&self, region: &str) -> aws_sdk_ec2::Client {
        let config = aws_sdk_ec2::config::Builder::from(&self.ctx.config)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_ec2::Client::from_conf(config)
    }
}

fn tag_map(tags: &[Tag]) -> BTreeMap<String, String> {
    tags.iter()
        .filter_map(|t| Some((t.key()?.to_string(), t.value().unwrap_or_default().to_string())))
        .collect()
}

fn name_tag(tags: &BTreeMap<String, String>) -> Option<String> {
    tags.get("Name").cloned()
}

fn detail(value: Option<impl Into<Value>>) -> Value {
    value.map(Into::into).unwrap_or(Value::Null)
}

#[async_trait]
impl Collector for Ec2Collector {
    fn service(&self) -> &str {
        "ec2"
    }

    async fn collect(&self, region: &str) -> Result<Vec<ResourceRecord>, CollectError> {
        let client = self.client(region);
        let account = &self.ctx.account_id;
        let mut records = Vec::new();

        let mut pages = client.describe_instances().into_paginator().send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| classify(region, e))?;
            for reservation in page.reservations() {
                for instance in reservation.instances() {
                    let Some(id) = instance.instance_id() else {
                        continue;
                    };
                    let tags = tag_map(instance.tags());
                    let mut record = ResourceRecord::new("ec2", "instance", id, region);
                    record.arn =
                        Some(format!("arn:aws:ec2:{region}:{account}:instance/{id}"));
                    record.name = name_tag(&tags).or_else(|| Some(id.to_string()));
                    record.details.insert(
                        "instance_type".to_string(),
                        detail(instance.instance_type().map(|t| t.as_str().to_string())),
                    );
                    record.details.insert(
                        "state".to_string(),
                        detail(
                            instance
                                .state()
                                .and_then(|s| s.name())
                                .map(|n| n.as_str().to_string()),
                        ),
                    );
                    record.details.insert(
                        "private_ip".to_string(),
                        detail(instance.private_ip_address().map(str::to_string)),
                    );
                    record.details.insert(
                        "public_ip".to_string(),
                        detail(instance.public_ip_address().map(str::to_string)),
                    );
                    record.details.insert(
                        "vpc_id".to_string(),
                        detail(instance.vpc_id().map(str::to_string)),
                    );
                    record.details.insert(
                        "subnet_id".to_string(),
                        detail(instance.subnet_id().map(str::to_string)),
                    );
                    record.details.insert(
                        "launch_time".to_string(),
                        detail(instance.launch_time().map(|t| t.to_string())),
                    );
                    record.tags = tags;
                    records.push(record);
                }
            }
        }

        let mut pages = client.describe_volumes().into_paginator().send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| classify(region, e))?;
            for volume in page.volumes() {
                let Some(id) = volume.volume_id() else {
                    continue;
                };
                let tags = tag_map(volume.tags());
                let mut record = ResourceRecord::new("ec2", "volume", id, region);
                record.arn = Some(format!("arn:aws:ec2:{region}:{account}:volume/{id}"));
                record.name = name_tag(&tags).or_else(|| Some(id.to_string()));
                record
                    .details
                    .insert("size_gb".to_string(), detail(volume.size()));
                record.details.insert(
                    "volume_type".to_string(),
                    detail(volume.volume_type().map(|t| t.as_str().to_string())),
                );
                record.details.insert(
                    "state".to_string(),
                    detail(volume.state().map(|s| s.as_str().to_string())),
                );
                record
                    .details
                    .insert("encrypted".to_string(), detail(volume.encrypted()));
                record.details.insert(
                    "availability_zone".to_string(),
                    detail(volume.availability_zone().map(str::to_string)),
                );
                record.details.insert(
                    "attachments".to_string(),
                    json!(volume
                        .attachments()
                        .iter()
                        .filter_map(|a| a.instance_id())
                        .collect::<Vec<_>>()),
                );
                record.tags = tags;
                records.push(record);
            }
        }

        let mut pages = client
            .describe_snapshots()
            .owner_ids(account.clone())
            .into_paginator()
            .send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| classify(region, e))?;
            for snapshot in page.snapshots() {
                let Some(id) = snapshot.snapshot_id() else {
                    continue;
                };
                let tags = tag_map(snapshot.tags());
                let mut record = ResourceRecord::new("ec2", "snapshot", id, region);
                record.arn = Some(format!("arn:aws:ec2:{region}:{account}:snapshot/{id}"));
                record.name = name_tag(&tags).or_else(|| Some(id.to_string()));
                record.details.insert(
                    "volume_id".to_string(),
                    detail(snapshot.volume_id().map(str::to_string)),
                );
                record
                    .details
                    .insert("size_gb".to_string(), detail(snapshot.volume_size()));
                record.details.insert(
                    "state".to_string(),
                    detail(snapshot.state().map(|s| s.as_str().to_string())),
                );
                record
                    .details
                    .insert("encrypted".to_string(), detail(snapshot.encrypted()));
                record.details.insert(
                    "start_time".to_string(),
                    detail(snapshot.start_time().map(|t| t.to_string())),
                );
                record.tags = tags;
                records.push(record);
            }
        }

        let mut pages = client.describe_security_groups().into_paginator().send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| classify(region, e))?;
            for group in page.security_groups() {
                let Some(id) = group.group_id() else {
                    continue;
                };
                let tags = tag_map(group.tags());
                let mut record = ResourceRecord::new("ec2", "security-group", id, region);
                record.arn =
                    Some(format!("arn:aws:ec2:{region}:{account}:security-group/{id}"));
                record.name = group
                    .group_name()
                    .map(str::to_string)
                    .or_else(|| name_tag(&tags));
                record.details.insert(
                    "description".to_string(),
                    detail(group.description().map(str::to_string)),
                );
                record.details.insert(
                    "vpc_id".to_string(),
                    detail(group.vpc_id().map(str::to_string)),
                );
                record.details.insert(
                    "ingress_rules".to_string(),
                    json!(group.ip_permissions().len()),
                );
                record.details.insert(
                    "egress_rules".to_string(),
                    json!(group.ip_permissions_egress().len()),
                );
                record.tags = tags;
                records.push(record);
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_map_skips_keyless_entries() {
        let tags = vec![
            Tag::builder().key("Name").value("web-1").build(),
            Tag::builder().value("orphan").build(),
        ];
        let map = tag_map(&tags);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("Name").map(String::as_str), Some("web-1"));
        assert_eq!(name_tag(&map).as_deref(), Some("web-1"));
    }
}
