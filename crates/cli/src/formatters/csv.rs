//! CSV formatter implementation.
//!
//! Responsibilities:
//! - Render resources as RFC 4180 compliant CSV with one fixed column set.
//!
//! Does NOT handle:
//! - Other output formats.
//!
//! An empty scan still renders the header row so pipelines can parse the
//! output.

use anyhow::Result;

use awsmap_scanner::ScanResult;

use crate::formatters::common::tags_inline;
use crate::formatters::Formatter;

const COLUMNS: [&str; 7] = ["service", "type", "id", "name", "region", "arn", "tags"];

/// CSV formatter.
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format_scan(&self, result: &ScanResult) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(COLUMNS)?;
        for record in &result.resources {
            writer.write_record([
                record.service.as_str(),
                record.resource_type.as_str(),
                record.id.as_str(),
                record.name.as_deref().unwrap_or(""),
                record.region.as_str(),
                record.arn.as_deref().unwrap_or(""),
                tags_inline(&record.tags).as_str(),
            ])?;
        }
        let buffer = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("failed to flush csv output: {e}"))?;
        Ok(String::from_utf8(buffer)?)
    }
}
