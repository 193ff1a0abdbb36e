use thiserror::Error;

/// Hard failures of a load-test run.
///
/// Per-attempt transport failures are never reported here; they are folded
/// into the run result instead.
#[derive(Debug, Error)]
pub enum LoadTestError {
    #[error("Load test needs a positive request count or a positive duration.")]
    MissingWorkload,
    #[error("Load test task failed: {source}")]
    TaskFailed {
        #[source]
        source: tokio::task::JoinError,
    },
}
