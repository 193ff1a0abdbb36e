use reqwest::Url;
use reqwest::header::{HeaderName, HeaderValue};

use crate::args::HttpMethod;
use crate::error::HttpError;

/// The fixed request sent on every attempt of a run.
///
/// The engine never looks inside it; it is handed to the transport verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RequestSpec {
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Checks that the URL and headers can be turned into a real request.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL does not parse, uses a scheme other than
    /// http/https, or a header name/value is not valid HTTP.
    pub fn validate(&self) -> Result<Url, HttpError> {
        let url = Url::parse(&self.url).map_err(|err| HttpError::InvalidUrl {
            url: self.url.clone(),
            source: err,
        })?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(HttpError::UnsupportedScheme {
                    scheme: other.to_owned(),
                });
            }
        }

        for (key, value) in &self.headers {
            HeaderName::from_bytes(key.as_bytes()).map_err(|err| {
                HttpError::InvalidHeaderName {
                    header: key.clone(),
                    source: err,
                }
            })?;
            HeaderValue::from_str(value).map_err(|err| HttpError::InvalidHeaderValue {
                header: key.clone(),
                source: err,
            })?;
        }

        Ok(url)
    }
}
