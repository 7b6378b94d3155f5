//! AWS resource scan orchestrator.
//!
//! This crate plans (service, region) work units from a static service
//! catalog and a collector registry, executes them on a bounded worker pool
//! with per-unit failure isolation and timing, and merges the outcomes into
//! a single deduplicated, tag-filtered, deterministically ordered
//! [`ScanResult`].
//!
//! The crate never talks to the provider itself: enumeration is delegated
//! to [`Collector`] implementations registered by service identifier (see
//! the `awsmap-collectors` crate for the AWS SDK-backed set).

pub mod aggregate;
pub mod cancellation;
pub mod catalog;
pub mod collector;
pub mod error;
pub mod exclusions;
pub mod filter;
pub mod plan;
pub mod progress;
pub mod record;
pub mod scan;
pub mod scheduler;

pub use cancellation::CancellationToken;
pub use catalog::{RegionMode, ServiceCatalog};
pub use collector::{Collector, CollectorRegistry};
pub use error::CollectError;
pub use filter::TagFilter;
pub use plan::{Plan, PlanRejection};
pub use progress::{ProgressCallback, ScanEvent, ScanProgress};
pub use record::{
    AccountIdentity, ResourceRecord, ScanMetadata, ScanResult, UnitError, WorkOutcome, WorkUnit,
};
pub use scan::{ScanOptions, Scanner, DEFAULT_CONCURRENCY};
pub use scheduler::Scheduler;
