//! JSON formatter implementation.
//!
//! Responsibilities:
//! - Render the full scan result (metadata, resources, errors) as
//!   pretty-printed JSON.
//!
//! Does NOT handle:
//! - Other output formats.

use anyhow::Result;

use awsmap_scanner::ScanResult;

use crate::formatters::Formatter;

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_scan(&self, result: &ScanResult) -> Result<String> {
        Ok(serde_json::to_string_pretty(result)?)
    }
}
