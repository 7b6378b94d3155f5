//! Configuration types for a scan run.
//!
//! Responsibilities:
//! - Define the plain-value settings surface the CLI and library consume.
//!
//! Does NOT handle:
//! - Loading or precedence (see `loader`).
//! - Cross-field validation beyond what the scanner's resolver encodes.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default worker-pool width for a scan.
pub const DEFAULT_WORKERS: usize = 40;

/// What the scan should cover and how hard it may push the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Credential profile name; `None` uses the provider's default chain.
    pub profile: Option<String>,
    /// Requested regions; empty means every enabled region.
    pub regions: Vec<String>,
    /// Requested services; empty means every available collector.
    pub services: Vec<String>,
    /// Include global services even when the region filter misses their
    /// control-plane region.
    pub include_global: bool,
    pub workers: usize,
    /// Deadline in seconds for one collector invocation; `None` disables it.
    pub unit_timeout_seconds: Option<u64>,
    /// Raw `Key=Value` tag filter clauses, parsed by the scanner.
    pub tag_filters: Vec<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            profile: None,
            regions: Vec::new(),
            services: Vec::new(),
            include_global: false,
            workers: DEFAULT_WORKERS,
            unit_timeout_seconds: None,
            tag_filters: Vec::new(),
        }
    }
}

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
    #[default]
    Html,
    Table,
}

impl OutputFormat {
    /// File extension for auto-generated output paths.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Html => "html",
            Self::Table => "txt",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "html" => Ok(Self::Html),
            "table" => Ok(Self::Table),
            other => Err(format!(
                "invalid output format '{other}', valid options: json, csv, html, table"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Html => "html",
            Self::Table => "table",
        })
    }
}

/// Where and how the report is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    /// Output path; `None` auto-generates `<account>_inventory_<ts>.<ext>`.
    pub output_file: Option<PathBuf>,
    /// Suppress progress output on stderr.
    pub quiet: bool,
    /// Print the per-service timing summary after the scan.
    pub timings: bool,
}

/// The complete run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    pub scan: ScanSettings,
    pub output: OutputSettings,
}
