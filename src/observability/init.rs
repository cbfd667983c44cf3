//! Tracing initialization and subscriber setup.

use super::tracer;
use crate::infrastructure::{expand_tilde, get_data_dir};
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use std::path::PathBuf;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name and instrumentation scope of every exported span.
const SERVICE_NAME: &str = "marketmod";

/// Name of the OTLP JSON trace file inside the trace directory.
pub const TRACE_FILE_NAME: &str = "marketmod-otlp.json";

/// Installs the global tracing subscriber.
///
/// The pipeline is:
/// 1. `EnvFilter` from `RUST_LOG`, else `config.trace_level`, else `info`
/// 2. OpenTelemetry layer exporting spans to `<trace_dir>/marketmod-otlp.json`
/// 3. A compact stderr layer, only when `trace_level` is set explicitly
///
/// Observability is optional: when the trace directory cannot be created the
/// file layer is skipped, and a second call is a no-op.
///
/// # Returns
///
/// The trace file path when the file exporter is active.
///
/// # Example
///
/// ```rust,no_run
/// use marketmod::observability::init_tracing;
/// use marketmod::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) -> Option<PathBuf> {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let trace_dir = config
        .trace_dir
        .as_deref()
        .map_or_else(get_data_dir, |dir| PathBuf::from(expand_tilde(dir)));

    let trace_file = std::fs::create_dir_all(&trace_dir)
        .is_ok()
        .then(|| trace_dir.join(TRACE_FILE_NAME));

    let otel_layer = trace_file.clone().map(|path| {
        let resource = Resource::new(vec![
            KeyValue::new("service.name", SERVICE_NAME),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ]);
        let provider = tracer::create_tracer_provider(path, resource, SERVICE_NAME);
        OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME))
    });

    let stderr_layer = config
        .trace_level
        .is_some()
        .then(|| fmt::layer().compact().with_target(false).with_writer(std::io::stderr));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(trace_file = ?trace_file, level, "tracing initialized");
    }
    trace_file
}
