//! The run façade: one call from plan to finished [`ScanResult`].
//!
//! Responsibilities:
//! - Hold the per-process inputs (catalog, registry, account identity,
//!   enabled regions) and drive plan -> schedule -> aggregate for each run.
//!
//! Does NOT handle:
//! - Credential resolution or region enablement lookup (callers supply
//!   both; see the `awsmap-collectors` crate).
//!
//! Invariants:
//! - Remote failures never surface from [`Scanner::scan`]; they are always
//!   absorbed into `ScanResult.errors`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::aggregate::aggregate;
use crate::cancellation::CancellationToken;
use crate::catalog::ServiceCatalog;
use crate::collector::CollectorRegistry;
use crate::filter::TagFilter;
use crate::plan::{plan, Plan};
use crate::progress::{ProgressCallback, ScanProgress};
use crate::record::{AccountIdentity, ScanResult};
use crate::scheduler::Scheduler;

/// Default worker-pool width.
pub const DEFAULT_CONCURRENCY: usize = 40;

/// Per-run configuration, all fields optional in spirit: the default scans
/// everything the registry can reach.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Requested regions; empty means every enabled region.
    pub regions: Vec<String>,
    /// Requested services; empty means every registered service.
    pub services: Vec<String>,
    /// Force global services into a region-filtered scan.
    pub include_global: bool,
    pub concurrency: usize,
    /// Deadline for a single collector invocation.
    pub unit_timeout: Option<Duration>,
    pub tag_filter: TagFilter,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            regions: Vec::new(),
            services: Vec::new(),
            include_global: false,
            concurrency: DEFAULT_CONCURRENCY,
            unit_timeout: None,
            tag_filter: TagFilter::new(),
        }
    }
}

/// Orchestrates scans against one account.
#[derive(Debug)]
pub struct Scanner {
    catalog: ServiceCatalog,
    registry: CollectorRegistry,
    identity: AccountIdentity,
    enabled_regions: Vec<String>,
}

impl Scanner {
    /// Build a scanner over the built-in catalog.
    pub fn new(
        registry: CollectorRegistry,
        identity: AccountIdentity,
        enabled_regions: Vec<String>,
    ) -> Self {
        Self::with_catalog(
            ServiceCatalog::builtin().clone(),
            registry,
            identity,
            enabled_regions,
        )
    }

    /// Build a scanner over an explicit catalog (tests use small ones).
    pub fn with_catalog(
        catalog: ServiceCatalog,
        registry: CollectorRegistry,
        identity: AccountIdentity,
        enabled_regions: Vec<String>,
    ) -> Self {
        Self {
            catalog,
            registry,
            identity,
            enabled_regions,
        }
    }

    pub fn registry(&self) -> &CollectorRegistry {
        &self.registry
    }

    /// Compute the work plan for `options` without executing it.
    pub fn plan(&self, options: &ScanOptions) -> Plan {
        plan(
            &self.catalog,
            &self.registry,
            &self.enabled_regions,
            &options.regions,
            &options.services,
            options.include_global,
        )
    }

    /// Run a full scan: plan, execute on the worker pool, aggregate.
    ///
    /// Cancellation yields a partial result assembled from completed units.
    pub async fn scan(
        &self,
        options: &ScanOptions,
        cancel: &CancellationToken,
        progress: Option<ProgressCallback>,
    ) -> ScanResult {
        let started = Instant::now();
        let plan = self.plan(options);
        tracing::info!(
            units = plan.units.len(),
            services = plan.services.len(),
            regions = plan.regions.len(),
            rejected = plan.rejected.len(),
            "scan planned"
        );

        let progress = Arc::new(ScanProgress::new(&plan, progress));
        let scheduler = Scheduler::new(options.concurrency, options.unit_timeout);
        let outcomes = scheduler.run(plan.units.clone(), cancel, progress).await;

        aggregate(
            &plan,
            outcomes,
            &options.tag_filter,
            &self.catalog,
            &self.identity,
            started.elapsed(),
        )
    }
}
