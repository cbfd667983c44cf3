//! OpenTelemetry-based observability with file-based trace export.
//!
//! Spans from `tracing` are bridged into OpenTelemetry and written as OTLP
//! JSON lines to a rotating file, for offline analysis of a console session.
//!
//! ```text
//! tracing → tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → JSON file
//! ```
//!
//! - **Location**: `$XDG_DATA_HOME/marketmod/marketmod-otlp.json` unless
//!   `trace_dir` is configured
//! - **Rotation**: at 10 MB, keeping 3 backups
//! - **Level**: `RUST_LOG`, then `trace_level`, then `info`
//!
//! Outgoing API requests carry the active span as a W3C `traceparent`
//! header, so server-side traces can be joined with the file.
//!
//! # Modules
//!
//! - `init`: Subscriber setup
//! - `tracer`: Tracer provider with the file exporter
//! - `span_formatter`: OTLP JSON serialization
//! - `file_writer`: Rotating file writer

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, TRACE_FILE_NAME};
