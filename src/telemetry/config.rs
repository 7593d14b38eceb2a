use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub headers: HashMap<String, String>,
    pub service_name: String,
}

impl TelemetryConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let enabled = lookup("OTEL_ENABLED")
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);

        let endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT")
            .unwrap_or_else(|| "http://localhost:4318/v1/traces".to_string());

        let service_name = lookup("OTEL_SERVICE_NAME").unwrap_or_else(|| "oaslint".to_string());

        // "key=value,key2=value2"
        let headers = lookup("OTEL_EXPORTER_OTLP_HEADERS")
            .map(|raw| {
                raw.split(',')
                    .filter_map(|pair| pair.split_once('='))
                    .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            enabled,
            endpoint,
            headers,
            service_name,
        }
    }
}
