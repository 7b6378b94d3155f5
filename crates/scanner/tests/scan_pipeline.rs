//! End-to-end scan pipeline tests: plan -> bounded execution -> aggregate,
//! driven through the public [`Scanner`] API with in-process fake
//! collectors.
//!
//! Invariants exercised:
//! - One broken unit never disturbs sibling outcomes or fails the run.
//! - The same inputs always produce identically ordered results.
//! - Overlapping units collapse duplicate identities.
//! - Cancellation yields a partial result, not an error.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{register, test_catalog, BrokenCollector, FixedCollector};

use awsmap_scanner::cancellation::CancellationToken;
use awsmap_scanner::collector::CollectorRegistry;
use awsmap_scanner::error::CollectError;
use awsmap_scanner::record::AccountIdentity;
use awsmap_scanner::scan::{ScanOptions, Scanner};

fn identity() -> AccountIdentity {
    AccountIdentity::new("123456789012")
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_end_to_end_partial_failure() {
    // Two regional services and one global, one regional collector broken,
    // pool width 2.
    let mut registry = CollectorRegistry::new();
    register(
        &mut registry,
        FixedCollector::new("ec2", "instance", vec!["i-a", "i-b"]),
    );
    register(
        &mut registry,
        BrokenCollector {
            service: "rds",
            error: CollectError::AccessDenied("rds:DescribeDBInstances".to_string()),
        },
    );
    register(
        &mut registry,
        FixedCollector::new("iam", "role", vec!["deploy"]),
    );

    let scanner = Scanner::with_catalog(
        test_catalog(),
        registry,
        identity(),
        strings(&["us-east-1"]),
    );
    let options = ScanOptions {
        concurrency: 2,
        ..Default::default()
    };

    let result = scanner
        .scan(&options, &CancellationToken::new(), None)
        .await;

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].service, "rds");
    assert_eq!(result.errors[0].region, "us-east-1");

    let keys: Vec<(String, String)> = result
        .resources
        .iter()
        .map(|r| (r.service.clone(), r.id.clone()))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("ec2".to_string(), "i-a".to_string()),
            ("ec2".to_string(), "i-b".to_string()),
            ("iam".to_string(), "deploy".to_string()),
        ]
    );
    assert_eq!(result.metadata.resource_count, 3);
    assert_eq!(result.metadata.services_scanned, 3);
}

#[tokio::test]
async fn test_runs_are_reproducible() {
    let build_registry = || {
        let mut registry = CollectorRegistry::new();
        register(
            &mut registry,
            FixedCollector::new("ec2", "instance", vec!["i-c", "i-a", "i-b"]),
        );
        register(
            &mut registry,
            FixedCollector::new("rds", "db-instance", vec!["orders-db"]),
        );
        registry
    };

    let options = ScanOptions {
        concurrency: 4,
        ..Default::default()
    };
    let regions = strings(&["us-east-1", "eu-west-1", "ap-south-1"]);

    let first = Scanner::with_catalog(test_catalog(), build_registry(), identity(), regions.clone())
        .scan(&options, &CancellationToken::new(), None)
        .await;
    let second = Scanner::with_catalog(test_catalog(), build_registry(), identity(), regions)
        .scan(&options, &CancellationToken::new(), None)
        .await;

    assert_eq!(
        serde_json::to_string(&first.resources).unwrap(),
        serde_json::to_string(&second.resources).unwrap()
    );
    assert_eq!(first.errors, second.errors);
}

#[tokio::test]
async fn test_overlapping_units_deduplicate() {
    // The self-reporting storage service lists the same buckets from every
    // scan region; the result must carry each bucket once.
    let mut registry = CollectorRegistry::new();
    register(&mut registry, {
        let mut c = FixedCollector::new("s3", "bucket", vec!["logs", "assets"]);
        c.home_region = Some("eu-west-1");
        c
    });

    let scanner = Scanner::with_catalog(
        test_catalog(),
        registry,
        identity(),
        strings(&["us-east-1", "eu-west-1", "ap-south-1"]),
    );

    let result = scanner
        .scan(&ScanOptions::default(), &CancellationToken::new(), None)
        .await;

    let ids: Vec<&str> = result.resources.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["assets", "logs"]);
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn test_cancellation_returns_partial_result() {
    let mut registry = CollectorRegistry::new();
    register(&mut registry, {
        let mut c = FixedCollector::new("ec2", "instance", vec!["i-a"]);
        c.delay = Some(Duration::from_millis(150));
        c
    });

    let scanner = Scanner::with_catalog(
        test_catalog(),
        registry,
        identity(),
        (0..8).map(|i| format!("region-{i}")).collect(),
    );

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(40)).await;
        canceller.cancel();
    });

    let options = ScanOptions {
        concurrency: 2,
        ..Default::default()
    };
    let result = scanner.scan(&options, &cancel, None).await;

    // In-flight units finish, queued ones never start.
    assert!(!result.resources.is_empty());
    assert!(result.resources.len() < 8);
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn test_unknown_service_reported_not_fatal() {
    let mut registry = CollectorRegistry::new();
    register(
        &mut registry,
        FixedCollector::new("ec2", "instance", vec!["i-a"]),
    );

    let scanner = Scanner::with_catalog(
        test_catalog(),
        registry,
        identity(),
        strings(&["us-east-1"]),
    );
    let options = ScanOptions {
        services: strings(&["ec2", "totally-made-up"]),
        ..Default::default()
    };

    let result = scanner
        .scan(&options, &CancellationToken::new(), None)
        .await;

    assert_eq!(result.resources.len(), 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].service, "totally-made-up");
    assert_eq!(result.errors[0].region, "-");
}

#[tokio::test]
async fn test_progress_events_cover_every_service() {
    use std::sync::Mutex;

    use awsmap_scanner::progress::ScanEvent;

    let mut registry = CollectorRegistry::new();
    register(
        &mut registry,
        FixedCollector::new("ec2", "instance", vec!["i-a"]),
    );
    register(
        &mut registry,
        FixedCollector::new("rds", "db-instance", vec!["db-1"]),
    );

    let scanner = Scanner::with_catalog(
        test_catalog(),
        registry,
        identity(),
        strings(&["us-east-1", "eu-west-1"]),
    );

    let events: Arc<Mutex<Vec<ScanEvent>>> = Arc::default();
    let sink = events.clone();
    let result = scanner
        .scan(
            &ScanOptions::default(),
            &CancellationToken::new(),
            Some(Arc::new(move |event| sink.lock().unwrap().push(event))),
        )
        .await;
    assert_eq!(result.metadata.resource_count, 4);

    let events = events.lock().unwrap();
    let finished_services: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            ScanEvent::ServiceFinished { service, .. } => Some(service.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(finished_services.len(), 2);
    assert!(finished_services.contains(&"ec2"));
    assert!(finished_services.contains(&"rds"));

    let unit_count = events
        .iter()
        .filter(|e| matches!(e, ScanEvent::UnitFinished { .. }))
        .count();
    assert_eq!(unit_count, 4);
}
