use std::num::NonZeroUsize;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::LoadTestError;

/// Caller-facing settings for one run.
///
/// Exactly one of `total_requests`/`duration` sizes the workload. When both
/// are positive the request count wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadTestConfig {
    /// Parallel workers. Zero is treated as one.
    pub concurrency: usize,
    pub total_requests: Option<u64>,
    pub duration: Option<Duration>,
    pub ramp_up: Option<Duration>,
}

impl LoadTestConfig {
    /// Fixed-count run: `total_requests` attempts across `concurrency` workers.
    #[must_use]
    pub const fn count(concurrency: usize, total_requests: u64) -> Self {
        Self {
            concurrency,
            total_requests: Some(total_requests),
            duration: None,
            ramp_up: None,
        }
    }

    /// Time-boxed run: keep issuing attempts until `duration` has elapsed.
    #[must_use]
    pub const fn timed(concurrency: usize, duration: Duration) -> Self {
        Self {
            concurrency,
            total_requests: None,
            duration: Some(duration),
            ramp_up: None,
        }
    }

    #[must_use]
    pub const fn with_ramp_up(mut self, ramp_up: Duration) -> Self {
        self.ramp_up = Some(ramp_up);
        self
    }

    /// Resolves the settings into a plan the engine can execute.
    ///
    /// # Errors
    ///
    /// Returns [`LoadTestError::MissingWorkload`] when neither a positive
    /// request count nor a positive duration is set.
    pub fn plan(&self) -> Result<RunPlan, LoadTestError> {
        let count = self.total_requests.filter(|count| *count > 0);
        let duration = self.duration.filter(|duration| !duration.is_zero());
        let workload = match (count, duration) {
            (Some(count), Some(duration)) => {
                debug!(
                    "Both a request count ({}) and a duration ({:?}) were set; using the count.",
                    count, duration
                );
                Workload::Count(count)
            }
            (Some(count), None) => Workload::Count(count),
            (None, Some(duration)) => Workload::Duration(duration),
            (None, None) => return Err(LoadTestError::MissingWorkload),
        };

        let concurrency = NonZeroUsize::new(self.concurrency).unwrap_or_else(|| {
            warn!("Concurrency 0 is not usable; running with 1 worker.");
            NonZeroUsize::MIN
        });

        Ok(RunPlan {
            concurrency,
            workload,
            ramp_up: self.ramp_up.filter(|window| !window.is_zero()),
        })
    }
}

/// How many attempts a run issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workload {
    Count(u64),
    /// Best-effort sizing: tokens are emitted while the deadline has not
    /// passed, so the final count is only known once the run is over.
    Duration(Duration),
}

/// Validated form of [`LoadTestConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    pub concurrency: NonZeroUsize,
    pub workload: Workload,
    pub ramp_up: Option<Duration>,
}
