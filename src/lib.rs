//! Core library for the `volley` CLI.
//!
//! The [`loadtest`] module holds the engine: it sends one fixed request
//! through a [`http::Transport`] from a pool of concurrent workers, either a
//! fixed number of times or for a fixed duration, and folds every outcome
//! into a [`loadtest::LoadTestResult`] with latency percentiles and
//! throughput. The rest of the crate is the CLI around it: argument and
//! config parsing, the reqwest-backed transport, and reporting.
pub mod args;
pub mod config;
pub mod error;
pub mod http;
pub mod loadtest;
pub mod report;
pub mod shutdown;
