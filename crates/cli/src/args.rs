//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Merge parsed flags over environment-provided configuration
//!   (CLI > env > defaults).
//!
//! Non-responsibilities:
//! - Does not execute anything (see the `commands` module).

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use awsmap_config::{Config, ConfigLoader, OutputFormat};

#[derive(Parser)]
#[command(name = "awsmap")]
#[command(about = "awsmap - Map and inventory AWS resources", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  awsmap\n  awsmap -s ec2 -s s3 -s rds\n  awsmap -r us-east-1 -r eu-west-1\n  awsmap -p production -f json -o inventory.json\n  awsmap -t Owner=Tarek -t Environment=Production\n  awsmap --list-services\n"
)]
pub struct Cli {
    /// AWS profile name to use
    #[arg(short, long)]
    pub profile: Option<String>,

    /// AWS region(s) to scan (repeatable, comma-separated values allowed)
    #[arg(short, long = "region", value_delimiter = ',')]
    pub regions: Vec<String>,

    /// Service(s) to scan (repeatable, comma-separated values allowed)
    #[arg(short, long = "service", value_delimiter = ',')]
    pub services: Vec<String>,

    /// Output format
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (auto-generated if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Maximum parallel workers (default: 40)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Per-service-call timeout in seconds (no timeout if unset)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// List available service collectors and exit
    #[arg(long)]
    pub list_services: bool,

    /// Filter by tag (Key=Value format, repeatable; same key ORs values,
    /// different keys AND)
    #[arg(short = 't', long = "tag")]
    pub tags: Vec<String>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Show timing summary per service
    #[arg(long)]
    pub timings: bool,

    /// Include global services even when filtering by non-global regions
    #[arg(long)]
    pub include_global: bool,
}

impl Cli {
    /// Fold CLI flags over the environment-loaded configuration.
    pub fn build_config(&self, loader: ConfigLoader) -> Result<Config> {
        let mut loader = loader.from_env()?;

        if let Some(profile) = &self.profile {
            loader = loader.with_profile(profile.clone());
        }
        loader = loader
            .with_regions(self.regions.clone())
            .with_services(self.services.clone())
            .with_include_global(self.include_global)
            .with_tag_filters(self.tags.clone())
            .with_quiet(self.quiet)
            .with_timings(self.timings);
        if let Some(workers) = self.workers {
            loader = loader.with_workers(workers);
        }
        if let Some(timeout) = self.timeout {
            loader = loader.with_unit_timeout_seconds(timeout);
        }
        if let Some(format) = self.format {
            loader = loader.with_format(format);
        }
        if let Some(output) = &self.output {
            loader = loader.with_output_file(output.clone());
        }

        Ok(loader.build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeatable_and_comma_separated_values() {
        let cli = Cli::parse_from([
            "awsmap", "-s", "ec2,s3", "-s", "rds", "-r", "us-east-1", "-t", "Owner=John",
        ]);
        assert_eq!(cli.services, vec!["ec2", "s3", "rds"]);
        assert_eq!(cli.regions, vec!["us-east-1"]);
        assert_eq!(cli.tags, vec!["Owner=John"]);
    }

    #[test]
    fn test_cli_overrides_win() {
        let cli = Cli::parse_from(["awsmap", "-w", "4", "-f", "json"]);
        let config = cli.build_config(ConfigLoader::new()).unwrap();
        assert_eq!(config.scan.workers, 4);
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_defaults_flow_through() {
        let cli = Cli::parse_from(["awsmap"]);
        let config = cli.build_config(ConfigLoader::new()).unwrap();
        assert_eq!(config.scan.workers, awsmap_config::DEFAULT_WORKERS);
        assert_eq!(config.output.format, OutputFormat::Html);
        assert!(!config.output.quiet);
    }
}
