//! Fake collectors shared by the scanner integration tests.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use awsmap_scanner::catalog::{RegionMode, ServiceCatalog};
use awsmap_scanner::collector::{Collector, CollectorRegistry};
use awsmap_scanner::error::CollectError;
use awsmap_scanner::record::ResourceRecord;

/// Returns the same fixed records for every region it is invoked in.
pub struct FixedCollector {
    pub service: &'static str,
    pub resource_type: &'static str,
    pub ids: Vec<&'static str>,
    /// When set, records carry this region instead of the scan region
    /// (models the self-reporting storage service).
    pub home_region: Option<&'static str>,
    pub delay: Option<Duration>,
}

impl FixedCollector {
    pub fn new(service: &'static str, resource_type: &'static str, ids: Vec<&'static str>) -> Self {
        Self {
            service,
            resource_type,
            ids,
            home_region: None,
            delay: None,
        }
    }
}

#[async_trait]
impl Collector for FixedCollector {
    fn service(&self) -> &str {
        self.service
    }

    async fn collect(&self, region: &str) -> Result<Vec<ResourceRecord>, CollectError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let record_region = self.home_region.unwrap_or(region);
        Ok(self
            .ids
            .iter()
            .map(|id| ResourceRecord::new(self.service, self.resource_type, *id, record_region))
            .collect())
    }
}

/// Fails every invocation with a fixed error.
pub struct BrokenCollector {
    pub service: &'static str,
    pub error: CollectError,
}

#[async_trait]
impl Collector for BrokenCollector {
    fn service(&self) -> &str {
        self.service
    }

    async fn collect(&self, _region: &str) -> Result<Vec<ResourceRecord>, CollectError> {
        Err(self.error.clone())
    }
}

/// A small catalog matching the fake collectors below.
pub fn test_catalog() -> ServiceCatalog {
    ServiceCatalog::new(&[
        ("ec2", RegionMode::Regional),
        ("rds", RegionMode::Regional),
        ("s3", RegionMode::PerResourceRegion),
        ("iam", RegionMode::Global { control_plane: "us-east-1" }),
    ])
}

pub fn register(registry: &mut CollectorRegistry, collector: impl Collector + 'static) {
    registry.register(Arc::new(collector));
}
