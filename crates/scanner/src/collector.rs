//! The collector seam: per-service enumeration behind one trait, registered
//! by service identifier.
//!
//! Responsibilities:
//! - Define the [`Collector`] contract every service implementation
//!   fulfills.
//! - Hold the registration table mapping service identifier to collector.
//!
//! Does NOT handle:
//! - Any concrete provider call (see the `awsmap-collectors` crate).
//!
//! Invariants:
//! - Implementations are read-only enumerations and safe to invoke
//!   repeatedly.
//! - An empty record list is a success, never an error.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CollectError;
use crate::record::ResourceRecord;

/// Enumerates one service's resources in one region.
///
/// For global services the scheduler passes the control-plane region; the
/// implementation may ignore it for the provider call but must attribute
/// the returned records to it.
#[async_trait]
pub trait Collector: Send + Sync {
    /// The catalog key this collector serves.
    fn service(&self) -> &str;

    /// Enumerate resources in `region`, surfacing provider failures as
    /// typed errors. Retry/backoff for throttling belongs inside the
    /// implementation, not in the caller.
    async fn collect(&self, region: &str) -> Result<Vec<ResourceRecord>, CollectError>;
}

/// Registration table from service identifier to collector.
///
/// The orchestrator holds collectors only through this table and is
/// oblivious to the concrete types behind it.
#[derive(Clone, Default)]
pub struct CollectorRegistry {
    inner: BTreeMap<String, Arc<dyn Collector>>,
}

impl CollectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collector under its own service key. Re-registering a key
    /// replaces the previous collector.
    pub fn register(&mut self, collector: Arc<dyn Collector>) {
        let service = collector.service().to_string();
        if self.inner.insert(service.clone(), collector).is_some() {
            tracing::warn!(service = %service, "collector re-registered, replacing previous");
        }
    }

    pub fn get(&self, service: &str) -> Option<Arc<dyn Collector>> {
        self.inner.get(service).cloned()
    }

    pub fn contains(&self, service: &str) -> bool {
        self.inner.contains_key(service)
    }

    /// Registered service identifiers, in sorted order.
    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl std::fmt::Debug for CollectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectorRegistry")
            .field("services", &self.inner.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullCollector(&'static str);

    #[async_trait]
    impl Collector for NullCollector {
        fn service(&self) -> &str {
            self.0
        }

        async fn collect(&self, _region: &str) -> Result<Vec<ResourceRecord>, CollectError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = CollectorRegistry::new();
        registry.register(Arc::new(NullCollector("ec2")));
        registry.register(Arc::new(NullCollector("s3")));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("ec2"));
        assert!(registry.get("rds").is_none());
        assert_eq!(registry.services().collect::<Vec<_>>(), vec!["ec2", "s3"]);
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut registry = CollectorRegistry::new();
        registry.register(Arc::new(NullCollector("ec2")));
        registry.register(Arc::new(NullCollector("ec2")));
        assert_eq!(registry.len(), 1);
    }
}
