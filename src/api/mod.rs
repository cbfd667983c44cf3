//! REST API access layer.
//!
//! # Modules
//!
//! - [`request`]: Transport-neutral request/response types and trace context
//! - [`transport`]: The [`Transport`] seam and its `reqwest` implementation
//! - [`endpoint`]: Consumed endpoints and their user-facing error messages
//! - [`client`]: Typed [`ApiClient`] with cancellation
//! - [`mock`]: Scripted [`MockTransport`](mock::MockTransport) for tests

pub mod client;
pub mod endpoint;
pub mod mock;
pub mod request;
pub mod transport;

pub use client::ApiClient;
pub use endpoint::Endpoint;
pub use request::{ApiRequest, ApiResponse, Method, TraceContext};
pub use transport::{HttpTransport, Transport, TransportError};
