//! Static service catalog: which services exist and how they map to
//! regions.
//!
//! Responsibilities:
//! - Record, per service, whether it is regional, global (account-wide,
//!   attributed to one control-plane region), or regional-with-self-reported
//!   resource regions.
//!
//! Does NOT handle:
//! - Which services have a collector available (see
//!   [`crate::collector::CollectorRegistry`]).
//!
//! The catalog is read-only and built from a constant table, so a malformed
//! entry is a compile-time problem, never a runtime one. Control-plane
//! assignments follow the provider's fault-isolation documentation: most
//! global services are administered from us-east-1, a couple from us-west-2.

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// How a service's resources relate to regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionMode {
    /// Scanned once per region; records carry the scan region.
    Regional,
    /// Scanned once per account, attributed to the control-plane region.
    Global { control_plane: &'static str },
    /// Scanned per region like a regional service, but every resource
    /// reports its own home region (the storage service: bucket location is
    /// a per-bucket property). Record-level region filtering happens in the
    /// aggregator.
    PerResourceRegion,
}

const US_EAST_1: &str = "us-east-1";
const US_WEST_2: &str = "us-west-2";

const ENTRIES: &[(&str, RegionMode)] = &[
    // Regional services.
    ("athena", RegionMode::Regional),
    ("dax", RegionMode::Regional),
    ("dynamodb", RegionMode::Regional),
    ("ec2", RegionMode::Regional),
    ("events", RegionMode::Regional),
    ("lambda", RegionMode::Regional),
    ("mediaconvert", RegionMode::Regional),
    ("memorydb", RegionMode::Regional),
    ("rds", RegionMode::Regional),
    ("scheduler", RegionMode::Regional),
    ("sns", RegionMode::Regional),
    ("sqs", RegionMode::Regional),
    ("xray", RegionMode::Regional),
    // Buckets are listed account-wide but live in specific regions.
    ("s3", RegionMode::PerResourceRegion),
    // Global services administered from us-east-1.
    ("budgets", RegionMode::Global { control_plane: US_EAST_1 }),
    ("ce", RegionMode::Global { control_plane: US_EAST_1 }),
    ("cloudfront", RegionMode::Global { control_plane: US_EAST_1 }),
    ("health", RegionMode::Global { control_plane: US_EAST_1 }),
    ("iam", RegionMode::Global { control_plane: US_EAST_1 }),
    ("organizations", RegionMode::Global { control_plane: US_EAST_1 }),
    ("route53", RegionMode::Global { control_plane: US_EAST_1 }),
    ("route53domains", RegionMode::Global { control_plane: US_EAST_1 }),
    ("shield", RegionMode::Global { control_plane: US_EAST_1 }),
    // Global services administered from us-west-2.
    ("globalaccelerator", RegionMode::Global { control_plane: US_WEST_2 }),
    ("networkmanager", RegionMode::Global { control_plane: US_WEST_2 }),
];

static BUILTIN: LazyLock<ServiceCatalog> = LazyLock::new(|| ServiceCatalog::new(ENTRIES));

/// Read-only service metadata, loaded once per process with no I/O.
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    entries: BTreeMap<&'static str, RegionMode>,
}

impl ServiceCatalog {
    /// Build a catalog from an explicit entry table (tests use small ones).
    pub fn new(entries: &[(&'static str, RegionMode)]) -> Self {
        Self {
            entries: entries.iter().copied().collect(),
        }
    }

    /// The process-wide catalog of known services.
    pub fn builtin() -> &'static ServiceCatalog {
        &BUILTIN
    }

    pub fn contains(&self, service: &str) -> bool {
        self.entries.contains_key(service)
    }

    pub fn region_mode(&self, service: &str) -> Option<RegionMode> {
        self.entries.get(service).copied()
    }

    /// True for account-wide services pinned to a control-plane region.
    pub fn is_global(&self, service: &str) -> bool {
        matches!(self.region_mode(service), Some(RegionMode::Global { .. }))
    }

    pub fn control_plane_region(&self, service: &str) -> Option<&'static str> {
        match self.region_mode(service) {
            Some(RegionMode::Global { control_plane }) => Some(control_plane),
            _ => None,
        }
    }

    /// All cataloged service identifiers, in sorted order.
    pub fn all_services(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }
}
