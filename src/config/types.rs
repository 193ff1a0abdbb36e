use std::time::Duration;

use serde::Deserialize;

use crate::args::{HttpMethod, parse_duration_value};
use crate::error::ValidationError;

/// Contents of `volley.toml` / `volley.json`.
///
/// Every field is optional; values given on the command line take
/// precedence over anything set here.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub request: Option<RequestConfig>,
    pub concurrency: Option<usize>,
    pub requests: Option<u64>,
    pub duration: Option<DurationValue>,
    pub ramp_up: Option<DurationValue>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub insecure: Option<bool>,
    pub redirect: Option<u32>,
}

/// The `[request]` table: what each worker sends.
#[derive(Debug, Default, Deserialize)]
pub struct RequestConfig {
    pub method: Option<HttpMethod>,
    pub url: Option<String>,
    /// `"Key: Value"` entries, same format as `--header`.
    pub headers: Option<Vec<String>>,
    pub body: Option<String>,
    pub body_file: Option<String>,
}

/// Either whole seconds (`30`) or a suffixed string (`"250ms"`, `"2m"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }
}
