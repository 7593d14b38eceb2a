mod config;
mod shutdown;

pub use config::TelemetryConfig;
pub use shutdown::TelemetryGuard;

use crate::LintError;
use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{WithExportConfig, WithHttpConfig};
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_FILTER: &str = "oaslint=info";

/// Install the tracing subscriber. Logs go to stderr so report output stays clean.
pub fn init_telemetry() -> crate::Result<TelemetryGuard> {
    let config = TelemetryConfig::from_env();

    if config.enabled {
        match init_with_otel(&config) {
            Ok(provider) => return Ok(TelemetryGuard::new(Some(provider))),
            Err(e) => {
                eprintln!(
                    "Failed to initialize OpenTelemetry: {}. Falling back to stdout-only logging.",
                    e
                );
            }
        }
    }

    init_stdout_only();
    Ok(TelemetryGuard::default())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn init_with_otel(config: &TelemetryConfig) -> crate::Result<SdkTracerProvider> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .map_err(|e| LintError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_http_client(client)
        .with_endpoint(&config.endpoint)
        .with_protocol(opentelemetry_otlp::Protocol::HttpBinary)
        .with_timeout(std::time::Duration::from_secs(5))
        .with_headers(config.headers.clone())
        .build()
        .map_err(|e| LintError::Configuration(format!("Failed to build OTLP exporter: {}", e)))?;

    let resource = opentelemetry_sdk::Resource::builder_empty()
        .with_service_name(config.service_name.clone())
        .with_attributes([KeyValue::new("service.version", env!("CARGO_PKG_VERSION"))])
        .build();

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build();

    let tracer = provider.tracer("oaslint");
    opentelemetry::global::set_tracer_provider(provider.clone());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()
        .map_err(|e| LintError::Configuration(format!("Failed to install subscriber: {}", e)))?;

    tracing::info!("OpenTelemetry initialized with endpoint: {}", config.endpoint);
    Ok(provider)
}

fn init_stdout_only() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .try_init();

    if installed.is_ok() {
        tracing::debug!("Tracing initialized (OpenTelemetry disabled)");
    }
}
