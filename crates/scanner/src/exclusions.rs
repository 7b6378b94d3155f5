//! Static exclusion rules for provider-created default resources.
//!
//! Every account gets a handful of resources it never asked for: a default
//! event bus in every region, a `Default` X-Ray group, `default.*` RDS
//! parameter groups, and so on. These are noise in an inventory and are
//! dropped by the aggregator before filtering and deduplication. The rules
//! are fixed per service and not user-configurable.

use crate::record::ResourceRecord;

/// One per-service predicate identifying provider-default noise.
pub struct ExclusionRule {
    pub service: &'static str,
    pub description: &'static str,
    matches: fn(&ResourceRecord) -> bool,
}

impl ExclusionRule {
    pub fn matches(&self, record: &ResourceRecord) -> bool {
        record.service == self.service && (self.matches)(record)
    }
}

/// The built-in rule set.
pub const DEFAULT_RULES: &[ExclusionRule] = &[
    ExclusionRule {
        service: "events",
        description: "default event bus",
        matches: |r| r.resource_type == "event-bus" && r.id == "default",
    },
    ExclusionRule {
        service: "xray",
        description: "Default trace group",
        matches: |r| r.resource_type == "group" && r.id == "Default",
    },
    ExclusionRule {
        service: "mediaconvert",
        description: "Default queue",
        matches: |r| r.resource_type == "queue" && r.id == "Default",
    },
    ExclusionRule {
        service: "rds",
        description: "default parameter and option groups",
        matches: |r| {
            (r.resource_type == "db-parameter-group" && r.id.starts_with("default."))
                || (r.resource_type == "option-group" && r.id.starts_with("default:"))
        },
    },
    ExclusionRule {
        service: "dax",
        description: "default parameter groups",
        matches: |r| r.resource_type == "parameter-group" && r.id.starts_with("default."),
    },
    ExclusionRule {
        service: "memorydb",
        description: "open-access ACL and default user",
        matches: |r| {
            (r.resource_type == "acl" && r.id == "open-access")
                || (r.resource_type == "user" && r.id == "default")
        },
    },
    ExclusionRule {
        service: "athena",
        description: "built-in Glue data catalog",
        matches: |r| r.resource_type == "data-catalog" && r.id == "AwsDataCatalog",
    },
    ExclusionRule {
        service: "scheduler",
        description: "default schedule group",
        matches: |r| r.resource_type == "schedule-group" && r.id == "default",
    },
];

/// True when any built-in rule identifies `record` as default noise.
pub fn is_default_noise(record: &ResourceRecord) -> bool {
    DEFAULT_RULES.iter().any(|rule| rule.matches(record))
}
