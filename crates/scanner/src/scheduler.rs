//! Bounded worker pool executing the planned work queue.
//!
//! Responsibilities:
//! - Drain the static unit queue with a fixed number of concurrent workers.
//! - Time every collector invocation and wrap its result or error into a
//!   [`WorkOutcome`]; a failing unit never affects its siblings.
//! - Stop dispatching new units once cancellation is requested, letting
//!   in-flight calls finish.
//!
//! Does NOT handle:
//! - Retries or backoff (collector-internal) and result ordering (the
//!   aggregator imposes a total order).
//!
//! Invariants:
//! - Exactly one outcome per dispatched unit.
//! - Shared mutable state is limited to the unit queue and the outcome
//!   channel; outcomes are never touched after insertion.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::cancellation::CancellationToken;
use crate::error::CollectError;
use crate::progress::ScanProgress;
use crate::record::{WorkOutcome, WorkUnit};

/// Executes work units on a fixed-width pool.
#[derive(Debug, Clone)]
pub struct Scheduler {
    concurrency: usize,
    unit_timeout: Option<Duration>,
}

impl Scheduler {
    /// `concurrency` is clamped to at least one worker.
    pub fn new(concurrency: usize, unit_timeout: Option<Duration>) -> Self {
        Self {
            concurrency: concurrency.max(1),
            unit_timeout,
        }
    }

    /// Run every unit to completion (or until cancellation stops dispatch)
    /// and return the completed outcomes.
    ///
    /// Outcome order follows completion, not input order.
    pub async fn run(
        &self,
        units: Vec<WorkUnit>,
        cancel: &CancellationToken,
        progress: Arc<ScanProgress>,
    ) -> Vec<WorkOutcome> {
        let planned = units.len();
        if planned == 0 {
            return Vec::new();
        }

        let queue = Arc::new(Mutex::new(VecDeque::from(units)));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let width = self.concurrency.min(planned);
        debug!(units = planned, width, "starting worker pool");

        let mut workers = JoinSet::new();
        for _ in 0..width {
            let queue = Arc::clone(&queue);
            let tx = tx.clone();
            let cancel = cancel.clone();
            let progress = Arc::clone(&progress);
            let unit_timeout = self.unit_timeout;

            workers.spawn(async move {
                loop {
                    // Cancellation is honored at the dispatch boundary only;
                    // the current unit always runs to completion.
                    if cancel.is_cancelled() {
                        break;
                    }
                    let unit = queue.lock().expect("work queue poisoned").pop_front();
                    let Some(unit) = unit else {
                        break;
                    };

                    let outcome = execute_unit(&unit, unit_timeout).await;
                    progress.unit_finished(
                        &unit.service,
                        &unit.region,
                        outcome.records.len(),
                        outcome.error.is_some(),
                    );
                    if tx.send(outcome).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        let mut outcomes = Vec::with_capacity(planned);
        while let Some(outcome) = rx.recv().await {
            outcomes.push(outcome);
        }
        while workers.join_next().await.is_some() {}

        if cancel.is_cancelled() {
            debug!(
                completed = outcomes.len(),
                planned, "scan cancelled, returning partial outcomes"
            );
        }
        outcomes
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(crate::scan::DEFAULT_CONCURRENCY, None)
    }
}

/// Invoke one unit's collector, timing it and absorbing its failure.
async fn execute_unit(unit: &WorkUnit, unit_timeout: Option<Duration>) -> WorkOutcome {
    let started = Instant::now();
    let call = unit.collector.collect(&unit.region);

    let result = match unit_timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(CollectError::Timeout(limit)),
        },
        None => call.await,
    };
    let elapsed = started.elapsed();

    match result {
        Ok(records) => {
            debug!(
                service = %unit.service,
                region = %unit.region,
                records = records.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "unit finished"
            );
            WorkOutcome::success(unit, records, elapsed)
        }
        Err(error) => {
            warn!(
                service = %unit.service,
                region = %unit.region,
                %error,
                "unit failed"
            );
            WorkOutcome::failure(unit, error, elapsed)
        }
    }
}
