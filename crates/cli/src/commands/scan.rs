//! The scan command: credentials, plan, run, summarize, export.
//!
//! Responsibilities:
//! - Resolve identity and region enablement, run the scan with progress and
//!   cancellation wired through, and hand the result to an exporter.
//!
//! Does NOT handle:
//! - Formatting details (see `formatters`) or scan semantics (see
//!   `awsmap-scanner`).
//!
//! Invariants:
//! - A run with failed units still exports and exits successfully; the
//!   failures are summarized on stderr.
//! - Cancellation still exports whatever completed, then reports exit
//!   code 130.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;

use awsmap_collectors::{builtin_registry, enabled_regions, load_config, resolve_identity, AwsContext};
use awsmap_config::{Config, OutputFormat};
use awsmap_scanner::{CancellationToken, ScanOptions, ScanResult, Scanner, TagFilter};

use crate::cancellation::Cancelled;
use crate::formatters;
use crate::progress::ScanReporter;

pub async fn run(config: &Config, cancel: &CancellationToken) -> Result<()> {
    let quiet = config.output.quiet;

    // Fail fast on an unusable tag filter before touching the network.
    let tag_filter = TagFilter::parse(&config.scan.tag_filters)?;

    if !quiet {
        eprintln!("\nValidating AWS credentials...");
    }
    let sdk_config = load_config(config.scan.profile.as_deref()).await;
    let identity = resolve_identity(&sdk_config).await?;
    if !quiet {
        eprintln!("  Account ID: {}", identity.account_id);
        if let Some(alias) = &identity.account_alias {
            eprintln!("  Account Alias: {alias}");
        }
        if let Some(arn) = &identity.caller_arn {
            eprintln!("  Caller ARN: {arn}");
        }
    }

    // The enablement source is only consulted when no region filter narrows
    // the run.
    let enabled = if config.scan.regions.is_empty() {
        enabled_regions(&sdk_config).await
    } else {
        Vec::new()
    };

    let ctx = AwsContext {
        config: sdk_config,
        account_id: identity.account_id.clone(),
    };
    let scanner = Scanner::new(builtin_registry(&ctx), identity, enabled);
    let options = ScanOptions {
        regions: config.scan.regions.clone(),
        services: config.scan.services.clone(),
        include_global: config.scan.include_global,
        concurrency: config.scan.workers,
        unit_timeout: config.scan.unit_timeout_seconds.map(Duration::from_secs),
        tag_filter,
    };

    if !quiet {
        eprintln!("\nCollecting resources...");
        eprintln!("{}", "-".repeat(40));
    }

    let planned_units = scanner.plan(&options).units.len();
    let reporter = ScanReporter::new(!quiet, planned_units);
    let result = scanner.scan(&options, cancel, reporter.callback()).await;
    reporter.finish();
    let was_cancelled = cancel.is_cancelled();

    if !quiet {
        eprintln!("{}", "-".repeat(40));
        eprintln!("\nScan complete!");
        eprintln!("  Resources found: {}", result.metadata.resource_count);
        eprintln!("  Services scanned: {}", result.metadata.services_scanned);
        eprintln!("  Regions scanned: {}", result.metadata.regions_scanned);
        eprintln!("  Duration: {:.1}s", result.metadata.scan_duration_seconds);
        if !result.errors.is_empty() {
            eprintln!(
                "  {} service/region pairs failed, showing partial results:",
                result.errors.len()
            );
            for error in &result.errors {
                eprintln!("    {} [{}]: {}", error.service, error.region, error.message);
            }
        }
    }
    if config.output.timings {
        print_timings(&result);
    }

    export(config, &result, quiet)?;

    if was_cancelled {
        return Err(Cancelled.into());
    }
    Ok(())
}

fn export(config: &Config, result: &ScanResult, quiet: bool) -> Result<()> {
    let formatted = formatters::format_scan(result, config.output.format)?;

    match (&config.output.output_file, config.output.format) {
        // Table without an explicit file renders to stdout.
        (None, OutputFormat::Table) => {
            println!("{formatted}");
        }
        (path, format) => {
            let path = path
                .clone()
                .unwrap_or_else(|| default_output_path(&result.metadata.account_id, format));
            formatters::write_to_file(&path, &formatted)
                .with_context(|| format!("failed to write output to {}", path.display()))?;
            if !quiet {
                eprintln!("\nOutput saved to: {}", path.display());
            }
        }
    }
    Ok(())
}

fn default_output_path(account_id: &str, format: OutputFormat) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!(
        "{account_id}_inventory_{timestamp}.{}",
        format.extension()
    ))
}

/// Timing summary sorted by accumulated service time, slowest first.
fn print_timings(result: &ScanResult) {
    let mut timings: Vec<(&String, &f64)> = result.metadata.service_timings.iter().collect();
    timings.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));

    eprintln!("\n{}", "=".repeat(60));
    eprintln!("SERVICE TIMING SUMMARY (sorted by total time)");
    eprintln!("{}", "=".repeat(60));
    for (service, seconds) in timings {
        eprintln!("{service:<30} {seconds:>8.2}s");
    }
    eprintln!("{}", "=".repeat(60));
    eprintln!(
        "{:<30} {:>8.2}s  ({} resources)",
        "TOTAL", result.metadata.scan_duration_seconds, result.metadata.resource_count
    );
    eprintln!("{}", "=".repeat(60));
}
