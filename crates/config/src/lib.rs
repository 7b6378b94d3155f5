//! Run configuration for the awsmap scanner.
//!
//! This crate provides the configuration types and the loader that merges
//! defaults, `AWSMAP_*` environment variables (optionally from a `.env`
//! file), and caller overrides. Precedence, lowest to highest: built-in
//! defaults, environment, explicit `with_*` overrides.

mod loader;
pub mod types;

pub use loader::{env_var_or_none, ConfigError, ConfigLoader};
pub use types::{Config, OutputFormat, OutputSettings, ScanSettings, DEFAULT_WORKERS};
