//! Error types, grouped by the layer that raises them.
mod app;
mod config;
mod http;
mod loadtest;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use http::{HttpError, RequestError};
pub use loadtest::LoadTestError;
pub use validation::ValidationError;
