use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::error::LoadTestError;
use crate::http::{RequestSpec, Transport};
use crate::shutdown::ShutdownReceiver;

use super::aggregator::{Aggregator, ProgressCallback};
use super::config::LoadTestConfig;
use super::ramp::RampController;
use super::result::LoadTestResult;
use super::scheduler::{Scheduler, work_queue};
use super::worker::Worker;

/// Runs one load test against a [`Transport`].
///
/// Build one per run; the scheduler, workers, and aggregator it spawns are
/// private to that run.
pub struct LoadTester<T> {
    transport: Arc<T>,
    progress: Option<ProgressCallback>,
    shutdown_rx: Option<ShutdownReceiver>,
}

impl<T: Transport> LoadTester<T> {
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::from_shared(Arc::new(transport))
    }

    #[must_use]
    pub const fn from_shared(transport: Arc<T>) -> Self {
        Self {
            transport,
            progress: None,
            shutdown_rx: None,
        }
    }

    /// Registers a callback receiving `(completed, planned_total)` after every
    /// attempt.
    #[must_use]
    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: FnMut(u64, u64) + Send + 'static,
    {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Stops emitting new attempts once a value arrives on `shutdown_rx`.
    /// Attempts already handed to a worker still run to completion.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown_rx: ShutdownReceiver) -> Self {
        self.shutdown_rx = Some(shutdown_rx);
        self
    }

    /// Drives `request` at the target and returns the drained result.
    ///
    /// # Errors
    ///
    /// Returns [`LoadTestError::MissingWorkload`] before any request is sent
    /// when the config sizes no work, or [`LoadTestError::TaskFailed`] when a
    /// worker or the aggregator panics.
    pub async fn run(
        self,
        request: RequestSpec,
        config: &LoadTestConfig,
    ) -> Result<LoadTestResult, LoadTestError> {
        let plan = config.plan()?;
        info!(
            "Starting load test: {} {} with {} workers ({:?}).",
            request.method,
            request.url,
            plan.concurrency,
            plan.workload
        );

        let started_at = Utc::now();
        let run_start = Instant::now();

        let (queue_tx, queue) = work_queue(plan.concurrency);
        let (outcomes_tx, outcomes_rx) = mpsc::channel(plan.concurrency.get());
        let (scheduler, planned_rx) = Scheduler::new(plan.workload, self.shutdown_rx);
        let aggregator = Aggregator::new(outcomes_rx, planned_rx, self.progress).spawn();

        let ramp = RampController::new(plan.ramp_up, plan.concurrency);
        let request = Arc::new(request);
        let mut worker_handles = Vec::with_capacity(plan.concurrency.get());
        for index in 0..plan.concurrency.get() {
            let worker = Worker {
                index,
                transport: Arc::clone(&self.transport),
                request: Arc::clone(&request),
                queue: Arc::clone(&queue),
                outcomes_tx: outcomes_tx.clone(),
                startup_delay: ramp.startup_delay(index),
            };
            worker_handles.push(tokio::spawn(worker.run()));
        }
        // Workers hold the only remaining handles, so the outcome queue
        // closes exactly when the last worker exits.
        drop(outcomes_tx);
        drop(queue);

        let issued = scheduler.run(queue_tx).await;

        let mut attempts: u64 = 0;
        let mut failure = None;
        for handle in worker_handles {
            if failure.is_some() {
                handle.abort();
                continue;
            }
            match handle.await {
                Ok(worker_attempts) => attempts = attempts.saturating_add(worker_attempts),
                Err(err) => failure = Some(err),
            }
        }
        if let Some(err) = failure {
            // Nothing may outlive a failed run.
            aggregator.abort();
            warn!("A worker task failed; aborted the remaining tasks.");
            return Err(LoadTestError::TaskFailed { source: err });
        }
        let aggregation = aggregator
            .await
            .map_err(|err| LoadTestError::TaskFailed { source: err })?;
        let elapsed = run_start.elapsed();

        let result = LoadTestResult::assemble(aggregation, started_at, elapsed);
        info!(
            "Load test finished: issued={} attempts={} total={} successful={} failed={} elapsed={:?}",
            issued, attempts, result.total, result.successful, result.failed, result.duration
        );
        Ok(result)
    }
}
