//! Table formatter implementation.
//!
//! Responsibilities:
//! - Render a terminal-friendly, tab-separated resource table with a
//!   trailing summary line.
//!
//! Does NOT handle:
//! - Other output formats or pagination.
//!
//! The empty state prints a human-readable message instead of an empty
//! table.

use anyhow::Result;

use awsmap_scanner::ScanResult;

use crate::formatters::common::tags_inline;
use crate::formatters::Formatter;

/// Tab-separated table formatter.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_scan(&self, result: &ScanResult) -> Result<String> {
        let mut output = String::new();

        if result.resources.is_empty() {
            output.push_str("No resources found.\n");
        } else {
            output.push_str("SERVICE\tTYPE\tID\tNAME\tREGION\tTAGS\n");
            for record in &result.resources {
                output.push_str(&format!(
                    "{}\t{}\t{}\t{}\t{}\t{}\n",
                    record.service,
                    record.resource_type,
                    record.id,
                    record.name.as_deref().unwrap_or("-"),
                    record.region,
                    tags_inline(&record.tags),
                ));
            }
        }

        output.push_str(&format!(
            "\n{} resources in account {} ({} services, {} regions, {:.1}s)\n",
            result.metadata.resource_count,
            result.metadata.account_id,
            result.metadata.services_scanned,
            result.metadata.regions_scanned,
            result.metadata.scan_duration_seconds,
        ));
        if !result.errors.is_empty() {
            output.push_str(&format!(
                "{} service/region pairs failed; results are partial\n",
                result.errors.len()
            ));
        }
        Ok(output)
    }
}
