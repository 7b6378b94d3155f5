//! Configuration loader: defaults, environment, explicit overrides.
//!
//! Responsibilities:
//! - Load `AWSMAP_*` environment variables (optionally seeded from a `.env`
//!   file) into a [`Config`], with a builder for caller overrides.
//!
//! Does NOT handle:
//! - Provider credentials; those belong to the AWS credential chain and are
//!   only named here via the profile setting.
//!
//! Invariants / Assumptions:
//! - Precedence, lowest to highest: built-in defaults, environment,
//!   explicit `with_*` overrides.
//! - `load_dotenv()` must be called explicitly; a missing `.env` file is
//!   not an error.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::{Config, OutputFormat};

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Failed to load .env file: {0}")]
    DotenvFailed(#[from] dotenvy::Error),
}

/// Read an environment variable, mapping unset and blank to `None`.
pub fn env_var_or_none(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Split a comma-separated environment value into trimmed entries.
fn env_list(name: &str) -> Vec<String> {
    env_var_or_none(name)
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env_var_or_none(name) {
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                var: name.to_string(),
                message: e.to_string(),
            }),
        None => Ok(None),
    }
}

fn env_bool(name: &str) -> Result<bool, ConfigError> {
    match env_var_or_none(name) {
        None => Ok(false),
        Some(value) => match value.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidValue {
                var: name.to_string(),
                message: format!("expected a boolean, got '{other}'"),
            }),
        },
    }
}

/// Builder merging configuration sources into a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: Config,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a `.env` file from the working directory if one exists.
    pub fn load_dotenv(&self) -> Result<(), ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => {
                tracing::debug!(path = %path.display(), "loaded .env file");
                Ok(())
            }
            Err(err) if err.not_found() => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Apply `AWSMAP_*` environment variables.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        if let Some(profile) = env_var_or_none("AWSMAP_PROFILE") {
            self.config.scan.profile = Some(profile);
        }
        let regions = env_list("AWSMAP_REGIONS");
        if !regions.is_empty() {
            self.config.scan.regions = regions;
        }
        let services = env_list("AWSMAP_SERVICES");
        if !services.is_empty() {
            self.config.scan.services = services;
        }
        if env_bool("AWSMAP_INCLUDE_GLOBAL")? {
            self.config.scan.include_global = true;
        }
        if let Some(workers) = env_parse::<usize>("AWSMAP_WORKERS")? {
            self.config.scan.workers = workers;
        }
        if let Some(timeout) = env_parse::<u64>("AWSMAP_UNIT_TIMEOUT")? {
            self.config.scan.unit_timeout_seconds = Some(timeout);
        }
        if let Some(format) = env_var_or_none("AWSMAP_FORMAT") {
            self.config.output.format =
                format
                    .parse::<OutputFormat>()
                    .map_err(|message| ConfigError::InvalidValue {
                        var: "AWSMAP_FORMAT".to_string(),
                        message,
                    })?;
        }
        if let Some(path) = env_var_or_none("AWSMAP_OUTPUT") {
            self.config.output.output_file = Some(PathBuf::from(path));
        }
        Ok(self)
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.config.scan.profile = Some(profile.into());
        self
    }

    pub fn with_regions(mut self, regions: Vec<String>) -> Self {
        if !regions.is_empty() {
            self.config.scan.regions = regions;
        }
        self
    }

    pub fn with_services(mut self, services: Vec<String>) -> Self {
        if !services.is_empty() {
            self.config.scan.services = services;
        }
        self
    }

    pub fn with_include_global(mut self, include_global: bool) -> Self {
        if include_global {
            self.config.scan.include_global = true;
        }
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config.scan.workers = workers;
        self
    }

    pub fn with_unit_timeout_seconds(mut self, seconds: u64) -> Self {
        self.config.scan.unit_timeout_seconds = Some(seconds);
        self
    }

    pub fn with_tag_filters(mut self, clauses: Vec<String>) -> Self {
        if !clauses.is_empty() {
            self.config.scan.tag_filters = clauses;
        }
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.config.output.format = format;
        self
    }

    pub fn with_output_file(mut self, path: PathBuf) -> Self {
        self.config.output.output_file = Some(path);
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.config.output.quiet = quiet;
        self
    }

    pub fn with_timings(mut self, timings: bool) -> Self {
        self.config.output.timings = timings;
        self
    }

    /// Finalize the configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        if self.config.scan.workers == 0 {
            return Err(ConfigError::InvalidValue {
                var: "workers".to_string(),
                message: "worker count must be at least 1".to_string(),
            });
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_defaults() {
        let config = ConfigLoader::new().build().unwrap();
        assert_eq!(config.scan.workers, crate::types::DEFAULT_WORKERS);
        assert_eq!(config.output.format, OutputFormat::Html);
    }

    #[test]
    fn test_env_overrides_defaults() {
        temp_env::with_vars(
            [
                ("AWSMAP_REGIONS", Some("us-east-1, eu-west-1")),
                ("AWSMAP_WORKERS", Some("8")),
                ("AWSMAP_INCLUDE_GLOBAL", Some("true")),
                ("AWSMAP_FORMAT", Some("json")),
            ],
            || {
                let config = ConfigLoader::new().from_env().unwrap().build().unwrap();
                assert_eq!(config.scan.regions, vec!["us-east-1", "eu-west-1"]);
                assert_eq!(config.scan.workers, 8);
                assert!(config.scan.include_global);
                assert_eq!(config.output.format, OutputFormat::Json);
            },
        );
    }

    #[test]
    fn test_explicit_overrides_beat_env() {
        temp_env::with_vars([("AWSMAP_WORKERS", Some("8"))], || {
            let config = ConfigLoader::new()
                .from_env()
                .unwrap()
                .with_workers(2)
                .build()
                .unwrap();
            assert_eq!(config.scan.workers, 2);
        });
    }

    #[test]
    fn test_invalid_env_values_rejected() {
        temp_env::with_vars([("AWSMAP_WORKERS", Some("lots"))], || {
            let err = ConfigLoader::new().from_env().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { ref var, .. } if var == "AWSMAP_WORKERS"));
        });

        temp_env::with_vars([("AWSMAP_INCLUDE_GLOBAL", Some("maybe"))], || {
            assert!(ConfigLoader::new().from_env().is_err());
        });

        temp_env::with_vars([("AWSMAP_FORMAT", Some("yaml"))], || {
            assert!(ConfigLoader::new().from_env().is_err());
        });
    }

    #[test]
    fn test_zero_workers_rejected() {
        let err = ConfigLoader::new().with_workers(0).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref var, .. } if var == "workers"));
    }

    #[test]
    fn test_blank_env_var_ignored() {
        temp_env::with_vars([("AWSMAP_PROFILE", Some("  "))], || {
            let config = ConfigLoader::new().from_env().unwrap().build().unwrap();
            assert!(config.scan.profile.is_none());
        });
    }
}
