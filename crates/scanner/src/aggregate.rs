//! Result aggregation: merging work-unit outcomes into one ordered,
//! filtered [`ScanResult`].
//!
//! Responsibilities:
//! - Flatten, exclude provider-default noise, tag-filter, region-scope,
//!   deduplicate, and sort records.
//! - Collect unit errors and planning rejections into the result's error
//!   list and compute run metadata.
//!
//! Does NOT handle:
//! - Executing units or rendering output.
//!
//! Invariants:
//! - Identical outcome sets produce identically ordered results no matter
//!   what order the scheduler completed them in: outcomes are pre-sorted by
//!   (service, region) before any order-sensitive step.
//! - Malformed `details`/`tags` on a record pass through untouched; only a
//!   structurally corrupt outcome (error and records both populated) is a
//!   contract violation.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;

use crate::catalog::{RegionMode, ServiceCatalog};
use crate::exclusions::is_default_noise;
use crate::filter::TagFilter;
use crate::plan::Plan;
use crate::record::{
    AccountIdentity, ResourceRecord, ScanMetadata, ScanResult, UnitError, WorkOutcome,
};

/// Merge all outcomes of one run into the final result.
pub fn aggregate(
    plan: &Plan,
    mut outcomes: Vec<WorkOutcome>,
    filter: &TagFilter,
    catalog: &ServiceCatalog,
    identity: &AccountIdentity,
    elapsed: Duration,
) -> ScanResult {
    // Completion order is nondeterministic; normalize it first so every
    // later step (in particular last-seen-wins dedup) is reproducible.
    outcomes.sort_by(|a, b| (&a.service, &a.region).cmp(&(&b.service, &b.region)));

    let mut errors: Vec<UnitError> = plan
        .rejected
        .iter()
        .map(|rejection| UnitError {
            service: rejection.service.clone(),
            region: "-".to_string(),
            message: rejection.reason.clone(),
        })
        .collect();

    let mut service_timings: BTreeMap<String, f64> = BTreeMap::new();
    let mut flattened: Vec<ResourceRecord> = Vec::new();
    for outcome in &mut outcomes {
        debug_assert!(
            outcome.error.is_none() || outcome.records.is_empty(),
            "outcome for {}/{} carries both records and an error",
            outcome.service,
            outcome.region
        );
        *service_timings.entry(outcome.service.clone()).or_default() +=
            outcome.elapsed.as_secs_f64();
        if let Some(error) = &outcome.error {
            errors.push(UnitError {
                service: outcome.service.clone(),
                region: outcome.region.clone(),
                message: error.to_string(),
            });
        } else {
            flattened.append(&mut outcome.records);
        }
    }
    for seconds in service_timings.values_mut() {
        *seconds = round2(*seconds);
    }

    let mut deduped: HashMap<(String, String, String, String), ResourceRecord> = HashMap::new();
    for record in flattened {
        if is_default_noise(&record) {
            continue;
        }
        if !filter.matches(&record.tags) {
            continue;
        }
        if !in_region_scope(&record, plan, catalog) {
            continue;
        }
        // Last seen wins; the outcome pre-sort makes "last" well-defined.
        deduped.insert(record.identity_key(), record);
    }

    let mut resources: Vec<ResourceRecord> = deduped.into_values().collect();
    resources.sort_by(|a, b| {
        (&a.service, &a.region, &a.resource_type, &a.id)
            .cmp(&(&b.service, &b.region, &b.resource_type, &b.id))
    });

    let metadata = ScanMetadata {
        account_id: identity.account_id.clone(),
        account_alias: identity.account_alias.clone(),
        caller_arn: identity.caller_arn.clone(),
        timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        scan_duration_seconds: round2(elapsed.as_secs_f64()),
        services_scanned: plan.services.len(),
        regions_scanned: plan.regions.len(),
        resource_count: resources.len(),
        service_timings,
        tag_filter: (!filter.is_empty()).then(|| filter.clone()),
    };

    ScanResult {
        metadata,
        resources,
        errors,
    }
}

/// Region-scope step for services whose resources self-report their home
/// region: when the run was region-restricted, a record whose true region
/// falls outside the effective region set is dropped here (the resolver
/// cannot know a resource's region at plan time).
fn in_region_scope(record: &ResourceRecord, plan: &Plan, catalog: &ServiceCatalog) -> bool {
    if !plan.region_filtered {
        return true;
    }
    match catalog.region_mode(&record.service) {
        Some(RegionMode::PerResourceRegion) => plan.regions.iter().any(|r| r == &record.region),
        _ => true,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::collector::{Collector, CollectorRegistry};
    use crate::error::CollectError;

    struct NullCollector(&'static str);

    #[async_trait]
    impl Collector for NullCollector {
        fn service(&self) -> &str {
            self.0
        }

        async fn collect(&self, _region: &str) -> Result<Vec<ResourceRecord>, CollectError> {
            Ok(Vec::new())
        }
    }

    fn catalog() -> ServiceCatalog {
        ServiceCatalog::new(&[
            ("ec2", RegionMode::Regional),
            ("events", RegionMode::Regional),
            ("s3", RegionMode::PerResourceRegion),
            ("iam", RegionMode::Global { control_plane: "us-east-1" }),
        ])
    }

    fn registry() -> CollectorRegistry {
        let mut registry = CollectorRegistry::new();
        for service in ["ec2", "events", "s3", "iam"] {
            registry.register(Arc::new(NullCollector(service)));
        }
        registry
    }

    fn make_plan(requested_regions: &[&str], requested_services: &[&str]) -> Plan {
        let enabled = vec!["us-east-1".to_string(), "eu-west-1".to_string()];
        crate::plan::plan(
            &catalog(),
            &registry(),
            &enabled,
            &requested_regions
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>(),
            &requested_services
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>(),
            false,
        )
    }

    fn outcome(service: &str, region: &str, records: Vec<ResourceRecord>) -> WorkOutcome {
        WorkOutcome {
            service: service.to_string(),
            region: region.to_string(),
            records,
            error: None,
            elapsed: Duration::from_millis(120),
        }
    }

    fn failed_outcome(service: &str, region: &str, error: CollectError) -> WorkOutcome {
        WorkOutcome {
            service: service.to_string(),
            region: region.to_string(),
            records: Vec::new(),
            error: Some(error),
            elapsed: Duration::from_millis(40),
        }
    }

    fn record(service: &str, rtype: &str, id: &str, region: &str) -> ResourceRecord {
        ResourceRecord::new(service, rtype, id, region)
    }

    #[test]
    fn test_deterministic_under_shuffled_outcomes() {
        let plan = make_plan(&[], &["ec2"]);
        let identity = AccountIdentity::new("123456789012");

        let build = |reversed: bool| {
            let mut outcomes = vec![
                outcome(
                    "ec2",
                    "us-east-1",
                    vec![
                        record("ec2", "instance", "i-b", "us-east-1"),
                        record("ec2", "instance", "i-a", "us-east-1"),
                    ],
                ),
                outcome(
                    "ec2",
                    "eu-west-1",
                    vec![record("ec2", "instance", "i-c", "eu-west-1")],
                ),
            ];
            if reversed {
                outcomes.reverse();
            }
            aggregate(
                &plan,
                outcomes,
                &TagFilter::new(),
                &catalog(),
                &identity,
                Duration::from_secs(1),
            )
        };

        let forward = build(false);
        let reversed = build(true);
        assert_eq!(forward.resources, reversed.resources);
        assert_eq!(
            serde_json::to_string(&forward.resources).unwrap(),
            serde_json::to_string(&reversed.resources).unwrap()
        );
        // Sorted by (service, region, type, id).
        let ids: Vec<_> = forward.resources.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["i-c", "i-a", "i-b"]);
    }

    #[test]
    fn test_duplicate_identity_collapses_last_seen_wins() {
        let plan = make_plan(&[], &["iam"]);
        let identity = AccountIdentity::new("123456789012");

        let mut first = record("iam", "role", "admin", "us-east-1");
        first
            .details
            .insert("path".to_string(), serde_json::Value::from("/old/"));
        let mut second = record("iam", "role", "admin", "us-east-1");
        second
            .details
            .insert("path".to_string(), serde_json::Value::from("/new/"));

        // Same identity reachable through two overlapping outcomes; the
        // outcome later in (service, region) order contributes last. Here
        // both share the pair, so within-unit order decides.
        let outcomes = vec![outcome("iam", "us-east-1", vec![first, second])];
        let result = aggregate(
            &plan,
            outcomes,
            &TagFilter::new(),
            &catalog(),
            &identity,
            Duration::from_secs(1),
        );

        assert_eq!(result.resources.len(), 1);
        assert_eq!(
            result.resources[0].details.get("path").unwrap(),
            &serde_json::Value::from("/new/")
        );
    }

    #[test]
    fn test_exclusion_wins_over_tag_filter() {
        let plan = make_plan(&[], &["events"]);
        let identity = AccountIdentity::new("123456789012");

        let mut noise = record("events", "event-bus", "default", "us-east-1");
        noise
            .tags
            .insert("Owner".to_string(), "John".to_string());
        let mut kept = record("events", "event-bus", "orders", "us-east-1");
        kept.tags.insert("Owner".to_string(), "John".to_string());

        let filter = TagFilter::parse(&["Owner=John"]).unwrap();
        let result = aggregate(
            &plan,
            vec![outcome("events", "us-east-1", vec![noise, kept])],
            &filter,
            &catalog(),
            &identity,
            Duration::from_secs(1),
        );

        assert_eq!(result.resources.len(), 1);
        assert_eq!(result.resources[0].id, "orders");
        assert!(result.metadata.tag_filter.is_some());
    }

    #[test]
    fn test_tag_filter_drops_non_matches() {
        let plan = make_plan(&[], &["ec2"]);
        let identity = AccountIdentity::new("123456789012");

        let mut tagged = record("ec2", "instance", "i-a", "us-east-1");
        tagged.tags.insert("Env".to_string(), "Prod".to_string());
        let untagged = record("ec2", "instance", "i-b", "us-east-1");

        let filter = TagFilter::parse(&["Env=Prod"]).unwrap();
        let result = aggregate(
            &plan,
            vec![outcome("ec2", "us-east-1", vec![tagged, untagged])],
            &filter,
            &catalog(),
            &identity,
            Duration::from_secs(1),
        );

        assert_eq!(result.resources.len(), 1);
        assert_eq!(result.resources[0].id, "i-a");
    }

    #[test]
    fn test_self_reported_region_scoped_when_filtered() {
        let plan = make_plan(&["eu-west-1"], &["s3"]);
        let identity = AccountIdentity::new("123456789012");

        // One scan unit returns buckets from several home regions.
        let records = vec![
            record("s3", "bucket", "in-scope", "eu-west-1"),
            record("s3", "bucket", "out-of-scope", "ap-southeast-2"),
        ];
        let result = aggregate(
            &plan,
            vec![outcome("s3", "eu-west-1", records)],
            &TagFilter::new(),
            &catalog(),
            &identity,
            Duration::from_secs(1),
        );

        assert_eq!(result.resources.len(), 1);
        assert_eq!(result.resources[0].id, "in-scope");
    }

    #[test]
    fn test_self_reported_region_kept_without_filter() {
        let plan = make_plan(&[], &["s3"]);
        let identity = AccountIdentity::new("123456789012");

        let records = vec![record("s3", "bucket", "anywhere", "ap-southeast-2")];
        let result = aggregate(
            &plan,
            vec![outcome("s3", "us-east-1", records)],
            &TagFilter::new(),
            &catalog(),
            &identity,
            Duration::from_secs(1),
        );
        assert_eq!(result.resources.len(), 1);
    }

    #[test]
    fn test_errors_collected_from_outcomes_and_rejections() {
        let plan = make_plan(&[], &["ec2", "nosuchservice"]);
        let identity = AccountIdentity::new("123456789012");

        let outcomes = vec![
            outcome(
                "ec2",
                "us-east-1",
                vec![record("ec2", "instance", "i-a", "us-east-1")],
            ),
            failed_outcome(
                "ec2",
                "eu-west-1",
                CollectError::AccessDenied("ec2:DescribeInstances".to_string()),
            ),
        ];
        let result = aggregate(
            &plan,
            outcomes,
            &TagFilter::new(),
            &catalog(),
            &identity,
            Duration::from_secs(2),
        );

        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].service, "nosuchservice");
        assert_eq!(result.errors[0].region, "-");
        assert_eq!(result.errors[1].service, "ec2");
        assert_eq!(result.errors[1].region, "eu-west-1");
        assert!(result.errors[1].message.contains("access denied"));
        assert_eq!(result.resources.len(), 1);
        assert_eq!(result.metadata.resource_count, 1);
    }

    #[test]
    fn test_metadata_counts_and_timings() {
        let plan = make_plan(&[], &["ec2"]);
        let identity = AccountIdentity {
            account_id: "123456789012".to_string(),
            account_alias: Some("prod".to_string()),
            caller_arn: Some("arn:aws:iam::123456789012:user/scanner".to_string()),
        };

        let outcomes = vec![
            outcome("ec2", "us-east-1", vec![record("ec2", "instance", "i-a", "us-east-1")]),
            outcome("ec2", "eu-west-1", Vec::new()),
        ];
        let result = aggregate(
            &plan,
            outcomes,
            &TagFilter::new(),
            &catalog(),
            &identity,
            Duration::from_millis(3450),
        );

        assert_eq!(result.metadata.account_id, "123456789012");
        assert_eq!(result.metadata.account_alias.as_deref(), Some("prod"));
        assert_eq!(result.metadata.services_scanned, 1);
        assert_eq!(result.metadata.regions_scanned, 2);
        assert_eq!(result.metadata.resource_count, 1);
        assert_eq!(result.metadata.scan_duration_seconds, 3.45);
        // Two 120 ms units accumulate under one service.
        assert_eq!(result.metadata.service_timings.get("ec2"), Some(&0.24));
        assert!(result.metadata.tag_filter.is_none());
        assert!(result.metadata.timestamp.ends_with("UTC"));
    }
}
