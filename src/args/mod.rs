//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;
#[cfg(test)]
pub(crate) mod test_support;
mod types;


pub use cli::LoadArgs;
pub use types::HttpMethod;

pub(crate) use parsers::{parse_duration_value, parse_header};
