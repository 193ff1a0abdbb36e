use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::http::{RequestSpec, Transport};

use super::outcome::RequestOutcome;
use super::scheduler::{WorkQueue, WorkToken};

pub(super) struct Worker<T> {
    pub(super) index: usize,
    pub(super) transport: Arc<T>,
    pub(super) request: Arc<RequestSpec>,
    pub(super) queue: WorkQueue,
    pub(super) outcomes_tx: mpsc::Sender<RequestOutcome>,
    pub(super) startup_delay: Duration,
}

impl<T: Transport> Worker<T> {
    /// One attempt per token, no retries, until the queue is closed and empty.
    /// Returns the number of attempts made.
    pub(super) async fn run(self) -> u64 {
        if !self.startup_delay.is_zero() {
            debug!(
                "Worker {} waiting {:?} before its first request.",
                self.index, self.startup_delay
            );
            tokio::time::sleep(self.startup_delay).await;
        }

        let mut attempts: u64 = 0;
        while next_token(&self.queue).await.is_some() {
            let started = Instant::now();
            let result = self.transport.send(&self.request).await;
            let outcome = RequestOutcome::from_attempt(result, started.elapsed());
            attempts = attempts.saturating_add(1);
            if self.outcomes_tx.send(outcome).await.is_err() {
                warn!("Worker {} lost the aggregator; stopping.", self.index);
                break;
            }
        }

        debug!("Worker {} finished after {} attempts.", self.index, attempts);
        attempts
    }
}

async fn next_token(queue: &WorkQueue) -> Option<WorkToken> {
    let mut queue_rx = queue.lock().await;
    queue_rx.recv().await
}
