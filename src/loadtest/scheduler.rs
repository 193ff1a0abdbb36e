use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::time::Instant;
use tracing::debug;

use crate::shutdown::ShutdownReceiver;

use super::config::Workload;

/// Permission to issue one request attempt.
#[derive(Debug, Clone, Copy)]
pub(super) struct WorkToken;

/// Receiving end of the work queue, shared by every worker.
pub(super) type WorkQueue = Arc<Mutex<mpsc::Receiver<WorkToken>>>;

/// Bounded to the worker count; a full queue is what holds the scheduler back.
pub(super) fn work_queue(concurrency: NonZeroUsize) -> (mpsc::Sender<WorkToken>, WorkQueue) {
    let (queue_tx, queue_rx) = mpsc::channel(concurrency.get());
    (queue_tx, Arc::new(Mutex::new(queue_rx)))
}

pub(super) struct Scheduler {
    workload: Workload,
    planned_tx: watch::Sender<u64>,
    shutdown_rx: Option<ShutdownReceiver>,
}

impl Scheduler {
    /// Returns the scheduler and a receiver tracking the run's planned total.
    ///
    /// For a count workload the planned total starts at the count. For a
    /// duration workload it grows with every emitted token. Either way it is
    /// updated before the token that raises it is handed to a worker.
    pub(super) fn new(
        workload: Workload,
        shutdown_rx: Option<ShutdownReceiver>,
    ) -> (Self, watch::Receiver<u64>) {
        let initial = match workload {
            Workload::Count(count) => count,
            Workload::Duration(_) => 0,
        };
        let (planned_tx, planned_rx) = watch::channel(initial);
        (
            Self {
                workload,
                planned_tx,
                shutdown_rx,
            },
            planned_rx,
        )
    }

    /// Emits tokens until the workload is used up or a stop is signalled.
    ///
    /// Dropping `queue_tx` on return closes the queue. Returns how many
    /// tokens were emitted.
    pub(super) async fn run(mut self, queue_tx: mpsc::Sender<WorkToken>) -> u64 {
        let mut issued: u64 = 0;
        match self.workload {
            Workload::Count(count) => {
                while issued < count {
                    let Some(permit) = self.reserve(&queue_tx).await else {
                        break;
                    };
                    issued = issued.saturating_add(1);
                    permit.send(WorkToken);
                }
                if issued < count {
                    self.planned_tx.send_replace(issued);
                }
            }
            Workload::Duration(duration) => {
                // Only checked between tokens: a reservation that blocks past
                // the deadline still emits its token.
                let deadline = Instant::now().checked_add(duration);
                while deadline.is_none_or(|deadline| Instant::now() < deadline) {
                    let Some(permit) = self.reserve(&queue_tx).await else {
                        break;
                    };
                    issued = issued.saturating_add(1);
                    self.planned_tx.send_replace(issued);
                    permit.send(WorkToken);
                }
            }
        }
        debug!("Scheduler emitted {} tokens.", issued);
        issued
    }

    async fn reserve<'queue>(
        &mut self,
        queue_tx: &'queue mpsc::Sender<WorkToken>,
    ) -> Option<mpsc::Permit<'queue, WorkToken>> {
        loop {
            let Some(shutdown_rx) = self.shutdown_rx.as_mut() else {
                return queue_tx.reserve().await.ok();
            };
            let stop_requested = tokio::select! {
                biased;
                signal = shutdown_rx.recv() => !matches!(signal, Err(RecvError::Closed)),
                permit = queue_tx.reserve() => return permit.ok(),
            };
            if stop_requested {
                debug!("Stop requested; no further tokens will be emitted.");
                return None;
            }
            // Every stop sender is gone, so no stop can arrive any more.
            self.shutdown_rx = None;
        }
    }
}
