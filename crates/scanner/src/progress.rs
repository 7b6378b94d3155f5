//! Per-run progress tracking.
//!
//! Responsibilities:
//! - Count completed units and discovered resources per service for one
//!   run, and notify an optional callback as units and services finish.
//!
//! Does NOT handle:
//! - Rendering (the CLI decides how events are displayed, and keeps them
//!   off stdout).
//!
//! All state lives in this per-run value, threaded explicitly through the
//! scheduler; concurrent or repeated runs in one process never interfere.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::plan::Plan;

/// Progress notifications emitted while a scan runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// One (service, region) unit finished, successfully or not.
    UnitFinished {
        service: String,
        region: String,
        resources: usize,
        failed: bool,
    },
    /// Every planned unit of a service has finished.
    ServiceFinished { service: String, resources: usize },
}

/// Callback invoked for every [`ScanEvent`]; must be cheap and non-blocking.
pub type ProgressCallback = Arc<dyn Fn(ScanEvent) + Send + Sync>;

#[derive(Default)]
struct ServiceState {
    completed: usize,
    resources: usize,
}

/// Run-scoped progress counters, shared by the worker pool.
pub struct ScanProgress {
    totals: HashMap<String, usize>,
    state: Mutex<HashMap<String, ServiceState>>,
    callback: Option<ProgressCallback>,
}

impl ScanProgress {
    /// Precompute per-service unit totals from the plan.
    pub fn new(plan: &Plan, callback: Option<ProgressCallback>) -> Self {
        let mut totals: HashMap<String, usize> = HashMap::new();
        for unit in &plan.units {
            *totals.entry(unit.service.clone()).or_default() += 1;
        }
        Self {
            totals,
            state: Mutex::new(HashMap::new()),
            callback,
        }
    }

    /// Record one finished unit and fire the corresponding events.
    pub(crate) fn unit_finished(
        &self,
        service: &str,
        region: &str,
        resources: usize,
        failed: bool,
    ) {
        let service_done = {
            let mut state = self.state.lock().expect("progress state poisoned");
            let entry = state.entry(service.to_string()).or_default();
            entry.completed += 1;
            entry.resources += resources;
            let total = self.totals.get(service).copied().unwrap_or(0);
            (entry.completed >= total).then_some(entry.resources)
        };

        if let Some(callback) = &self.callback {
            callback(ScanEvent::UnitFinished {
                service: service.to_string(),
                region: region.to_string(),
                resources,
                failed,
            });
            if let Some(total_resources) = service_done {
                callback(ScanEvent::ServiceFinished {
                    service: service.to_string(),
                    resources: total_resources,
                });
            }
        }
    }

    /// Units completed so far, across all services.
    pub fn completed_units(&self) -> usize {
        let state = self.state.lock().expect("progress state poisoned");
        state.values().map(|s| s.completed).sum()
    }
}

impl std::fmt::Debug for ScanProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanProgress")
            .field("totals", &self.totals)
            .finish_non_exhaustive()
    }
}
