//! Scripted in-memory transport for tests and offline demos.

use super::request::{ApiRequest, ApiResponse, Method};
use super::transport::{Transport, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::time::{sleep, Duration};

/// Mock implementation for testing.
///
/// Responses are matched in registration order by method and path prefix.
/// A response registered with [`MockTransport::add_response_once`] is consumed
/// by the first request it answers. Unmatched requests get a 404.
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<Vec<MockResponse>>>,
    call_history: Arc<Mutex<Vec<ApiRequest>>>,
}

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub method: Method,
    pub path_prefix: String,
    pub reply: MockReply,
    pub delay: Duration,
    pub once: bool,
}

#[derive(Debug, Clone)]
pub enum MockReply {
    Json { status: u16, body: Value },
    Unreachable,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every matching request with `status` and `body`.
    pub fn add_response(&self, method: Method, path_prefix: &str, status: u16, body: Value) {
        self.push(method, path_prefix, MockReply::Json { status, body }, Duration::ZERO, false);
    }

    /// Answers the next matching request only, after `delay`.
    pub fn add_response_once(
        &self,
        method: Method,
        path_prefix: &str,
        status: u16,
        body: Value,
        delay: Duration,
    ) {
        self.push(method, path_prefix, MockReply::Json { status, body }, delay, true);
    }

    /// Answers every matching request with `status` and `body` after `delay`.
    pub fn add_response_with_delay(
        &self,
        method: Method,
        path_prefix: &str,
        status: u16,
        body: Value,
        delay: Duration,
    ) {
        self.push(method, path_prefix, MockReply::Json { status, body }, delay, false);
    }

    /// Makes every matching request fail as if the server were down.
    pub fn add_unreachable(&self, method: Method, path_prefix: &str) {
        self.push(method, path_prefix, MockReply::Unreachable, Duration::ZERO, false);
    }

    fn push(&self, method: Method, path_prefix: &str, reply: MockReply, delay: Duration, once: bool) {
        lock(&self.responses).push(MockResponse {
            method,
            path_prefix: path_prefix.to_string(),
            reply,
            delay,
            once,
        });
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn get_call_history(&self) -> Vec<ApiRequest> {
        lock(&self.call_history).clone()
    }

    /// Paths of the requests received so far, oldest first.
    #[must_use]
    pub fn called_paths(&self) -> Vec<String> {
        lock(&self.call_history)
            .iter()
            .map(|call| call.path.clone())
            .collect()
    }

    #[must_use]
    pub fn assert_called_with(&self, method: Method, path: &str) -> bool {
        lock(&self.call_history)
            .iter()
            .any(|call| call.method == method && call.path == path)
    }

    fn take_response(&self, request: &ApiRequest) -> Option<MockResponse> {
        let mut responses = lock(&self.responses);
        let index = responses
            .iter()
            .position(|r| r.method == request.method && request.path.starts_with(&r.path_prefix))?;
        if responses[index].once {
            Some(responses.remove(index))
        } else {
            Some(responses[index].clone())
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        lock(&self.call_history).push(request.clone());

        let Some(response) = self.take_response(&request) else {
            return Ok(ApiResponse {
                status: 404,
                body: r#"{"error":"Not found"}"#.to_string(),
            });
        };

        if !response.delay.is_zero() {
            sleep(response.delay).await;
        }

        match response.reply {
            MockReply::Json { status, body } => Ok(ApiResponse {
                status,
                body: body.to_string(),
            }),
            MockReply::Unreachable => Err(TransportError::Unreachable(format!(
                "mock: {} {} refused",
                request.method.as_str(),
                request.path
            ))),
        }
    }
}
