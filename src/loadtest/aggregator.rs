use std::collections::BTreeMap;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::outcome::RequestOutcome;

/// Called once per finished attempt with `(completed, planned_total)`.
///
/// Runs on the aggregator task, so calls are strictly ordered and a slow
/// callback slows the whole run down. It must not block indefinitely.
pub type ProgressCallback = Box<dyn FnMut(u64, u64) + Send>;

/// Counters owned by the aggregator task. Nothing else writes to them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(super) struct Aggregation {
    pub(super) total: u64,
    pub(super) successful: u64,
    pub(super) failed: u64,
    pub(super) status_codes: BTreeMap<u16, u64>,
    /// Keyed by the rendered error text; only identical messages collapse.
    pub(super) errors: BTreeMap<String, u64>,
    /// Latencies of successful attempts, in arrival order.
    pub(super) timings: Vec<Duration>,
}

impl Aggregation {
    pub(super) fn record(&mut self, outcome: RequestOutcome) {
        self.total = self.total.saturating_add(1);
        match outcome.error {
            Some(message) => {
                self.failed = self.failed.saturating_add(1);
                increment(self.errors.entry(message).or_insert(0));
            }
            None => {
                self.successful = self.successful.saturating_add(1);
                increment(self.status_codes.entry(outcome.status).or_insert(0));
                self.timings.push(outcome.latency);
            }
        }
    }
}

fn increment(counter: &mut u64) {
    *counter = counter.saturating_add(1);
}

/// Single consumer of the outcome queue.
pub(super) struct Aggregator {
    outcomes_rx: mpsc::Receiver<RequestOutcome>,
    planned_rx: watch::Receiver<u64>,
    progress: Option<ProgressCallback>,
}

impl Aggregator {
    pub(super) fn new(
        outcomes_rx: mpsc::Receiver<RequestOutcome>,
        planned_rx: watch::Receiver<u64>,
        progress: Option<ProgressCallback>,
    ) -> Self {
        Self {
            outcomes_rx,
            planned_rx,
            progress,
        }
    }

    /// Spawns the consumer loop.
    ///
    /// The handle resolves only after every outcome sender is dropped and the
    /// queue is empty, so awaiting it is the drain signal for the run.
    pub(super) fn spawn(self) -> JoinHandle<Aggregation> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) -> Aggregation {
        let mut state = Aggregation::default();
        let mut last_reported = None;
        while let Some(outcome) = self.outcomes_rx.recv().await {
            state.record(outcome);
            last_reported = self.report_progress(&state);
        }

        // The planned total is final once every worker has exited. A stopped
        // run may have lowered it after the last outcome was reported.
        if state.total > 0 && last_reported != Some((state.total, self.planned_for(&state))) {
            self.report_progress(&state);
        }
        state
    }

    fn planned_for(&self, state: &Aggregation) -> u64 {
        let planned = *self.planned_rx.borrow();
        planned.max(state.total)
    }

    fn report_progress(&mut self, state: &Aggregation) -> Option<(u64, u64)> {
        let reported = (state.total, self.planned_for(state));
        let progress = self.progress.as_mut()?;
        progress(reported.0, reported.1);
        Some(reported)
    }
}
