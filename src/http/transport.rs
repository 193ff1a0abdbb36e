use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;

use crate::error::{HttpError, RequestError};

use super::RequestSpec;
use super::client::{ClientSettings, build_client};

/// Sends one request and reports the response status.
///
/// Implementations must not retry; one call is one attempt. Any response that
/// carries a status code is `Ok`, whatever the code. `Err` is reserved for
/// failures below HTTP (timeouts, refused connections, DNS, broken bodies).
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn send(&self, request: &RequestSpec) -> Result<u16, RequestError>;
}

/// [`Transport`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds the transport and its underlying client.
    ///
    /// # Errors
    ///
    /// Returns an error when the TLS backend or client configuration cannot
    /// be initialised.
    pub fn new(settings: &ClientSettings) -> Result<Self, HttpError> {
        Ok(Self {
            client: build_client(settings)?,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestSpec) -> Result<u16, RequestError> {
        let mut request_builder = self
            .client
            .request(request.method.as_reqwest(), request.url.as_str());
        for (key, value) in &request.headers {
            request_builder = request_builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body.as_ref() {
            request_builder = request_builder.body(body.clone());
        }

        let response = request_builder.send().await?;
        let status = response.status().as_u16();
        // Latency covers the whole response, not just the headers.
        drain_response_body(response).await?;
        Ok(status)
    }
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
