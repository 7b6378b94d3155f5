//! CLI-side cancellation plumbing.
//!
//! Responsibilities:
//! - Define the recognizable `Cancelled` error used to signal
//!   user-initiated cancellation (Ctrl+C/SIGINT) through `anyhow::Result`.
//! - Centralize the cancellation message.
//!
//! Does NOT handle:
//! - The token itself (lives in `awsmap_scanner::cancellation` so the
//!   scheduler can honor it) or signal installation (see `main`).

use std::fmt;

/// Marker error used to indicate user-driven cancellation.
#[derive(Debug, Clone, Copy)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cancelled")
    }
}

impl std::error::Error for Cancelled {}

/// Returns true if this anyhow error represents a cancellation.
pub fn is_cancelled_error(err: &anyhow::Error) -> bool {
    err.is::<Cancelled>()
}

/// Print the standard cancellation message to stderr.
pub fn print_cancelled_message() {
    eprintln!("^C\nScan cancelled by user");
}
