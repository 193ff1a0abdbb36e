use std::num::NonZeroUsize;
use std::time::Duration;

/// Staggers worker start-up so concurrency climbs linearly over a window.
#[derive(Debug, Clone, Copy)]
pub(super) struct RampController {
    window: Option<Duration>,
    workers: NonZeroUsize,
}

impl RampController {
    pub(super) const fn new(window: Option<Duration>, workers: NonZeroUsize) -> Self {
        Self { window, workers }
    }

    /// Delay before worker `worker_index` pulls its first token:
    /// `window * index / workers`. Worker 0 starts immediately.
    pub(super) fn startup_delay(&self, worker_index: usize) -> Duration {
        let Some(window) = self.window else {
            return Duration::ZERO;
        };
        let scaled = window
            .as_nanos()
            .saturating_mul(worker_index as u128)
            .checked_div(self.workers.get() as u128)
            .unwrap_or(0);
        Duration::from_nanos(u64::try_from(scaled).unwrap_or(u64::MAX))
    }
}
