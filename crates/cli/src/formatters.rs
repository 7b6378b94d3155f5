//! Output formatters for scan results.
//!
//! Responsibilities:
//! - Provide the JSON, CSV, HTML, and Table renderings of a
//!   [`ScanResult`] behind one seam.
//!
//! Does NOT handle:
//! - Printing to stdout or choosing the output path (see `commands::scan`).
//!
//! ## Empty-state handling
//!
//! Machine-readable formats produce valid, parseable output for an empty
//! scan (JSON: full document with `"resources": []`; CSV: header row only;
//! HTML: an empty table). The human-facing Table format prints
//! "No resources found." instead.

use anyhow::Result;

use awsmap_config::OutputFormat;
use awsmap_scanner::ScanResult;

mod common;
mod csv;
mod html;
mod json;
mod table;

pub use common::write_to_file;
pub use csv::CsvFormatter;
pub use html::HtmlFormatter;
pub use json::JsonFormatter;
pub use table::TableFormatter;

/// Renders one scan result into a complete output document.
pub trait Formatter {
    fn format_scan(&self, result: &ScanResult) -> Result<String>;
}

/// Render `result` in the requested format.
pub fn format_scan(result: &ScanResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => JsonFormatter.format_scan(result),
        OutputFormat::Csv => CsvFormatter.format_scan(result),
        OutputFormat::Html => HtmlFormatter.format_scan(result),
        OutputFormat::Table => TableFormatter.format_scan(result),
    }
}
