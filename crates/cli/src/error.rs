//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish
//!   failure modes.
//! - Map fatal pre-scan errors (credentials, validation) to those codes.
//!
//! Does NOT handle:
//! - Per-unit scan failures; those are absorbed into the scan result and
//!   never abort the run.
//!
//! Invariants:
//! - Exit code 130 is reserved for SIGINT (Unix standard: 128 + SIGINT).

use awsmap_collectors::IdentityError;

/// Structured exit codes for awsmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Command completed; a run with partial per-unit failures still
    /// succeeds and reports them in the result.
    Success = 0,

    /// Unhandled or generic failure.
    GeneralError = 1,

    /// Credentials missing, invalid, or expired.
    AuthenticationFailed = 2,

    /// Invalid input: bad tag filter, bad format, bad flag value.
    ValidationError = 5,

    /// SIGINT/Ctrl+C (Unix standard: 128 + 2).
    Interrupted = 130,
}

impl ExitCode {
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

/// Extract the appropriate exit code from an `anyhow` error chain.
pub trait ExitCodeExt {
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if cause.downcast_ref::<IdentityError>().is_some() {
                return ExitCode::AuthenticationFailed;
            }
            if cause
                .downcast_ref::<awsmap_scanner::filter::TagFilterError>()
                .is_some()
            {
                return ExitCode::ValidationError;
            }
            if cause.downcast_ref::<awsmap_config::ConfigError>().is_some() {
                return ExitCode::ValidationError;
            }
        }
        ExitCode::GeneralError
    }
}
