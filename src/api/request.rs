//! Transport-neutral request and response types.
//!
//! An [`ApiRequest`] captures the active OpenTelemetry span when it is built,
//! so the transport can propagate it as a W3C `traceparent` header.

use serde::Serialize;
use serde_json::Value;

/// Trace context for propagating distributed traces to the API server.
///
/// Carries the OpenTelemetry trace and span identifiers of the span that
/// issued a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a 32-digit hex string.
    pub trace_id: String,

    /// Span ID of the issuing span as a 16-digit hex string.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the span
    /// context is invalid.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use marketmod::api::TraceContext;
    ///
    /// if let Some(ctx) = TraceContext::from_current() {
    ///     println!("traceparent: {}", ctx.traceparent());
    /// }
    /// ```
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();
        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if span_context.is_valid() {
            Some(Self {
                trace_id: format!("{:032x}", span_context.trace_id()),
                parent_span_id: format!("{:016x}", span_context.span_id()),
            })
        } else {
            None
        }
    }

    /// Value of the W3C `traceparent` header (version 00, sampled).
    ///
    /// # Examples
    ///
    /// ```
    /// use marketmod::api::TraceContext;
    ///
    /// let ctx = TraceContext {
    ///     trace_id: "4bf92f3577b34da6a3ce929d0e0e4736".into(),
    ///     parent_span_id: "00f067aa0ba902b7".into(),
    /// };
    /// assert_eq!(ctx.traceparent(), "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01");
    /// ```
    #[must_use]
    pub fn traceparent(&self) -> String {
        format!("00-{}-{}-01", self.trace_id, self.parent_span_id)
    }
}

/// HTTP method of an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A single API call, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path plus query, e.g. `/ads?page=1`.
    pub path: String,
    /// JSON body for `POST`.
    pub body: Option<Value>,
    pub trace_context: Option<TraceContext>,
}

impl ApiRequest {
    /// `GET` request with the current trace context.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
            trace_context: TraceContext::from_current(),
        }
    }

    /// `POST` request with a JSON body and the current trace context.
    ///
    /// # Errors
    ///
    /// Returns [`MarketmodError::Decode`](crate::MarketmodError::Decode) if the
    /// body cannot be represented as JSON.
    pub fn post<B: Serialize>(path: impl Into<String>, body: Option<&B>) -> crate::Result<Self> {
        let body = body.map(serde_json::to_value).transpose()?;
        Ok(Self {
            method: Method::Post,
            path: path.into(),
            body,
            trace_context: TraceContext::from_current(),
        })
    }
}

/// Raw answer of the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}
