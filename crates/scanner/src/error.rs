//! Error types for collector invocations.

use std::time::Duration;
use thiserror::Error;

/// Failure of a single collector invocation.
///
/// Every variant is recoverable at the scheduler boundary: it is recorded in
/// the unit's outcome and reported in `ScanResult.errors`, and never aborts
/// sibling units or the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectError {
    /// The provider rejected the call rate (HTTP 429 / `Throttling` codes).
    ///
    /// Retry with backoff is a collector-internal concern; by the time this
    /// variant reaches the scheduler the collector has given up.
    #[error("throttled by the provider: {0}")]
    Throttled(String),

    /// The caller lacks permission to enumerate this resource type.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// The service does not operate in the requested region.
    #[error("service not available in region {region}")]
    UnsupportedRegion { region: String },

    /// The per-unit deadline elapsed before the collector returned.
    #[error("collection timed out after {0:?}")]
    Timeout(Duration),

    /// Any other provider API error (invalid state, internal error, ...).
    #[error("provider API error: {0}")]
    Api(String),

    /// The call never reached the provider (DNS, TLS, connect, ...).
    #[error("transport error: {0}")]
    Transport(String),
}

impl CollectError {
    /// True if the failure was a rate-limit rejection.
    pub fn is_throttling(&self) -> bool {
        matches!(self, Self::Throttled(_))
    }

    /// True if the failure is a permission problem rather than an
    /// environmental one.
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied(_))
    }

    /// True for failures that say nothing about the account's resources
    /// (timeouts and transport errors).
    pub fn is_environmental(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throttled_classification() {
        let err = CollectError::Throttled("rate exceeded".to_string());
        assert!(err.is_throttling());
        assert!(!err.is_access_denied());
        assert!(!err.is_environmental());
    }

    #[test]
    fn test_environmental_classification() {
        assert!(CollectError::Timeout(Duration::from_secs(30)).is_environmental());
        assert!(CollectError::Transport("connection refused".to_string()).is_environmental());
        assert!(!CollectError::Api("internal error".to_string()).is_environmental());
    }

    #[test]
    fn test_display_includes_region() {
        let err = CollectError::UnsupportedRegion {
            region: "eu-north-1".to_string(),
        };
        assert!(err.to_string().contains("eu-north-1"));
    }
}
