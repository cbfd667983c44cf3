//! HTTP transport seam.
//!
//! [`Transport`] is the only place where the console touches the network.
//! [`HttpTransport`] implements it with `reqwest`; tests use
//! [`MockTransport`](super::mock::MockTransport).

use super::request::{ApiRequest, ApiResponse, Method};
use crate::domain::{MarketmodError, Result};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Failure to obtain any HTTP response.
///
/// Status codes are not errors at this level; they are carried by
/// [`ApiResponse`] and interpreted by the client.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, timeout or broken body stream.
    #[error("server unreachable: {0}")]
    Unreachable(String),
}

/// Trait for sending API requests - allows for mocking in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request and returns the raw response.
    ///
    /// Dropping the returned future aborts the request.
    async fn send(&self, request: ApiRequest) -> std::result::Result<ApiResponse, TransportError>;
}

/// `reqwest`-backed transport rooted at the API base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport for `base_url` (e.g. `http://localhost:3001/api/v1`).
    ///
    /// # Errors
    ///
    /// Returns [`MarketmodError::Config`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("marketmod/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MarketmodError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> std::result::Result<ApiResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };

        if let Some(ctx) = &request.trace_context {
            builder = builder.header("traceparent", ctx.traceparent());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Unreachable(e.to_string()))?;

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let transport = HttpTransport::new("http://localhost:3001/api/v1/", Duration::from_secs(5)).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:3001/api/v1");
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let transport = HttpTransport::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let result = transport.send(ApiRequest::get("/ads")).await;
        assert!(matches!(result, Err(TransportError::Unreachable(_))));
    }
}
