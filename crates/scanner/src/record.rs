//! Core data model: resource records, work units, outcomes, and the final
//! scan result.
//!
//! Responsibilities:
//! - Define the one record shape every collector normalizes into.
//! - Define the scheduler's unit-of-work and outcome types.
//! - Define the aggregate result handed to exporters.
//!
//! Does NOT handle:
//! - Planning, scheduling, or aggregation logic (see `plan`, `scheduler`,
//!   `aggregate`).
//!
//! Invariants:
//! - A `ResourceRecord` always carries non-empty `service`, `resource_type`,
//!   `id`, and `region`; `details` and `tags` may be empty but never absent.
//! - A `WorkOutcome` carries an error XOR meaningful records; both populated
//!   is a collector contract violation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::collector::Collector;
use crate::error::CollectError;

/// One discovered cloud resource, normalized across all services.
///
/// `details` is intentionally an open mapping: each of the hundreds of
/// resource types contributes its own attribute schema, and the orchestrator
/// never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub service: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
    pub arn: Option<String>,
    pub name: Option<String>,
    /// For global resources this is the control-plane region; for the
    /// region-self-reporting storage service it is the region the provider
    /// reports for the individual resource.
    pub region: String,
    #[serde(default)]
    pub details: Map<String, Value>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl ResourceRecord {
    /// Create a record with empty `details`/`tags` and no arn/name.
    pub fn new(
        service: impl Into<String>,
        resource_type: impl Into<String>,
        id: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            resource_type: resource_type.into(),
            id: id.into(),
            arn: None,
            name: None,
            region: region.into(),
            details: Map::new(),
            tags: BTreeMap::new(),
        }
    }

    /// Identity key for deduplication: unique within an account.
    pub fn identity_key(&self) -> (String, String, String, String) {
        (
            self.service.clone(),
            self.resource_type.clone(),
            self.id.clone(),
            self.region.clone(),
        )
    }
}

/// One planned (service, region) pair, executed exactly once.
#[derive(Clone)]
pub struct WorkUnit {
    pub service: String,
    pub region: String,
    pub(crate) collector: Arc<dyn Collector>,
}

impl WorkUnit {
    pub fn new(
        service: impl Into<String>,
        region: impl Into<String>,
        collector: Arc<dyn Collector>,
    ) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
            collector,
        }
    }
}

impl fmt::Debug for WorkUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkUnit")
            .field("service", &self.service)
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

/// Result of executing one [`WorkUnit`].
#[derive(Debug, Clone)]
pub struct WorkOutcome {
    pub service: String,
    pub region: String,
    pub records: Vec<ResourceRecord>,
    pub error: Option<CollectError>,
    pub elapsed: Duration,
}

impl WorkOutcome {
    pub fn success(unit: &WorkUnit, records: Vec<ResourceRecord>, elapsed: Duration) -> Self {
        Self {
            service: unit.service.clone(),
            region: unit.region.clone(),
            records,
            error: None,
            elapsed,
        }
    }

    pub fn failure(unit: &WorkUnit, error: CollectError, elapsed: Duration) -> Self {
        Self {
            service: unit.service.clone(),
            region: unit.region.clone(),
            records: Vec::new(),
            error: Some(error),
            elapsed,
        }
    }
}

/// Identity of the scanned account, resolved before planning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentity {
    pub account_id: String,
    pub account_alias: Option<String>,
    pub caller_arn: Option<String>,
}

impl AccountIdentity {
    pub fn new(account_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            account_alias: None,
            caller_arn: None,
        }
    }
}

/// One failed (service, region) pair, as reported to the caller.
///
/// Planning rejections use `"-"` as the region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitError {
    pub service: String,
    pub region: String,
    pub message: String,
}

/// Run-level metadata attached to every [`ScanResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanMetadata {
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller_arn: Option<String>,
    pub timestamp: String,
    pub scan_duration_seconds: f64,
    pub services_scanned: usize,
    pub regions_scanned: usize,
    pub resource_count: usize,
    /// Accumulated collector time per service, in seconds. Sums unit
    /// durations, so it can exceed wall-clock time under concurrency.
    pub service_timings: BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_filter: Option<crate::filter::TagFilter>,
}

/// The aggregate of one scan run: immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub metadata: ScanMetadata,
    pub resources: Vec<ResourceRecord>,
    pub errors: Vec<UnitError>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_type_field() {
        let record = ResourceRecord::new("ec2", "instance", "i-0abc", "us-east-1");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "instance");
        assert_eq!(json["service"], "ec2");
        assert!(json["details"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_record_round_trip() {
        let mut record = ResourceRecord::new("s3", "bucket", "my-bucket", "eu-west-1");
        record.arn = Some("arn:aws:s3:::my-bucket".to_string());
        record.tags.insert("Owner".to_string(), "data".to_string());
        record
            .details
            .insert("versioning".to_string(), Value::from("Enabled"));

        let json = serde_json::to_string(&record).unwrap();
        let back: ResourceRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_identity_key_distinguishes_region() {
        let a = ResourceRecord::new("ec2", "instance", "i-0abc", "us-east-1");
        let b = ResourceRecord::new("ec2", "instance", "i-0abc", "us-west-2");
        assert_ne!(a.identity_key(), b.identity_key());
    }
}
