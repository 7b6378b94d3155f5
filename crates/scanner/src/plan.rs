//! Work-unit planning: resolving which (service, region) pairs a run
//! executes.
//!
//! Responsibilities:
//! - Resolve the effective service and region sets from the request.
//! - Emit one work unit per pair for regional services and at most one,
//!   pinned to the control-plane region, for global services.
//! - Reject unknown or collector-less requested services without failing
//!   the rest of the plan.
//!
//! Does NOT handle:
//! - Executing units (see `scheduler`) or record-level region filtering for
//!   the self-reporting storage service (see `aggregate`).
//!
//! Invariants:
//! - Units are emitted in sorted (service, region-order) order, so the same
//!   request always yields the same plan.
//! - The plan is computed once per run; no work is generated mid-run.

use std::collections::HashSet;

use crate::catalog::{RegionMode, ServiceCatalog};
use crate::collector::CollectorRegistry;
use crate::record::WorkUnit;

/// A requested service the resolver could not plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRejection {
    pub service: String,
    pub reason: String,
}

/// The fully-enumerated work queue for one run.
#[derive(Debug)]
pub struct Plan {
    pub units: Vec<WorkUnit>,
    pub rejected: Vec<PlanRejection>,
    /// Effective service set, sorted.
    pub services: Vec<String>,
    /// Effective region set, in request/enablement order.
    pub regions: Vec<String>,
    /// Whether the caller restricted regions (drives global inclusion and
    /// the aggregator's region-scope step).
    pub region_filtered: bool,
}

/// Trim, lowercase, and deduplicate while preserving first-seen order.
fn normalize(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

/// Compute the work units for one run.
///
/// `requested_regions`/`requested_services` empty means "all enabled" /
/// "all cataloged with a registered collector". A global service is planned
/// iff no region filter was requested, the filter contains its
/// control-plane region, or `include_global` forces it.
pub fn plan(
    catalog: &ServiceCatalog,
    registry: &CollectorRegistry,
    enabled_regions: &[String],
    requested_regions: &[String],
    requested_services: &[String],
    include_global: bool,
) -> Plan {
    let requested_regions = normalize(requested_regions);
    let requested_services = normalize(requested_services);

    let region_filtered = !requested_regions.is_empty();
    let regions: Vec<String> = if region_filtered {
        requested_regions
    } else {
        normalize(enabled_regions)
    };

    let mut rejected = Vec::new();
    let mut services: Vec<String> = if requested_services.is_empty() {
        catalog
            .all_services()
            .filter(|s| registry.contains(s))
            .map(str::to_string)
            .collect()
    } else {
        let mut valid = Vec::new();
        for service in requested_services {
            if !catalog.contains(&service) {
                rejected.push(PlanRejection {
                    reason: format!("unknown service '{service}'"),
                    service,
                });
            } else if !registry.contains(&service) {
                rejected.push(PlanRejection {
                    reason: format!("no collector registered for '{service}'"),
                    service,
                });
            } else {
                valid.push(service);
            }
        }
        valid
    };
    services.sort_unstable();

    let mut units = Vec::new();
    for service in &services {
        // Planned services are registry-backed by construction.
        let Some(collector) = registry.get(service) else {
            continue;
        };
        match catalog.region_mode(service) {
            Some(RegionMode::Global { control_plane }) => {
                let include = !region_filtered
                    || regions.iter().any(|r| r == control_plane)
                    || include_global;
                if include {
                    units.push(WorkUnit::new(service, control_plane, collector));
                } else {
                    tracing::debug!(
                        service = %service,
                        control_plane = %control_plane,
                        "global service outside requested regions, skipping"
                    );
                }
            }
            // The self-reporting storage service plans exactly like a
            // regional one; its records are scoped later by the aggregator.
            Some(RegionMode::Regional) | Some(RegionMode::PerResourceRegion) => {
                for region in &regions {
                    units.push(WorkUnit::new(service, region, collector.clone()));
                }
            }
            None => {}
        }
    }

    Plan {
        units,
        rejected,
        services,
        regions,
        region_filtered,
    }
}
