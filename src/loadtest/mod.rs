//! Load-testing engine.
//!
//! A run is a small pipeline: the scheduler pushes tokens onto a bounded work
//! queue, a pool of workers turns each token into one transport call, and a
//! single aggregator task folds the resulting outcomes into counters. Latency
//! statistics are computed once the aggregator has drained every outcome.
mod aggregator;
mod config;
mod engine;
mod outcome;
mod ramp;
mod result;
mod scheduler;
mod stats;
mod worker;


pub use aggregator::ProgressCallback;
pub use config::{LoadTestConfig, RunPlan, Workload};
pub use engine::LoadTester;
pub use outcome::RequestOutcome;
pub use result::LoadTestResult;
pub use stats::{LatencyStats, compute_latency_stats, requests_per_second};
