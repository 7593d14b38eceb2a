use opentelemetry_sdk::trace::SdkTracerProvider;

/// Flushes and shuts down the tracer provider, if any, when dropped
#[derive(Default)]
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    pub fn new(provider: Option<SdkTracerProvider>) -> Self {
        Self { provider }
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            tracing::debug!("Shutting down telemetry...");
            if let Err(e) = provider.shutdown() {
                eprintln!("Failed to shut down tracer provider: {}", e);
            }
        }
    }
}
