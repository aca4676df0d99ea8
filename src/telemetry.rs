use anyhow::{Context, Result};
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{runtime, Resource};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::config::{Config, Environment};

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub service_version: String,
    pub environment: String,
    pub otlp_endpoint: Option<String>,
    pub export_timeout: Duration,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: env!("CARGO_PKG_NAME").to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
            otlp_endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            export_timeout: Duration::from_secs(30),
        }
    }
}

impl TelemetryConfig {
    pub fn from_config(config: &Config) -> Self {
        let environment = match config.app.environment {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        };
        Self {
            environment: environment.to_string(),
            ..Self::default()
        }
    }
}

/// Telemetry handles for graceful shutdown
pub struct TelemetryHandles {
    exporting: bool,
}

impl TelemetryHandles {
    pub async fn shutdown(self) -> Result<()> {
        if self.exporting {
            info!("Flushing OTLP span exporter");
            global::shutdown_tracer_provider();
        }
        Ok(())
    }
}

/// Install the tracing subscriber and, when an OTLP endpoint is set, the span exporter.
pub async fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryHandles> {
    setup_tracing_subscriber()?;

    info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = %config.environment,
        "Initializing telemetry"
    );

    let exporting = match &config.otlp_endpoint {
        Some(endpoint) => {
            init_tracing(&config, endpoint)?;
            info!(endpoint = %endpoint, "Distributed tracing initialized with OTLP exporter");
            true
        }
        None => {
            info!("No OTLP endpoint configured, using console-only tracing");
            false
        }
    };

    Ok(TelemetryHandles { exporting })
}

fn create_resource(config: &TelemetryConfig) -> Resource {
    Resource::new(vec![
        KeyValue::new("service.name", config.service_name.clone()),
        KeyValue::new("service.version", config.service_version.clone()),
        KeyValue::new("deployment.environment", config.environment.clone()),
    ])
}

fn init_tracing(config: &TelemetryConfig, endpoint: &str) -> Result<()> {
    let provider = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint)
                .with_timeout(config.export_timeout),
        )
        .with_trace_config(
            opentelemetry_sdk::trace::Config::default()
                .with_resource(create_resource(config))
                .with_sampler(opentelemetry_sdk::trace::Sampler::AlwaysOn),
        )
        .install_batch(runtime::Tokio)
        .context("Failed to initialize OTLP tracer")?;

    global::set_tracer_provider(provider);
    Ok(())
}

fn setup_tracing_subscriber() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{}=debug,tower_http=info", env!("CARGO_CRATE_NAME")).into());

    Registry::default()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}

/// Meter whose instruments report through `tracing` at debug level.
pub fn get_meter(name: &str) -> LogMeter {
    LogMeter {
        name: name.to_string(),
    }
}

#[derive(Debug)]
pub struct LogMeter {
    name: String,
}

impl LogMeter {
    pub fn u64_counter(&self, name: &str) -> InstrumentBuilder<Counter> {
        InstrumentBuilder::new(&self.name, name)
    }

    pub fn f64_histogram(&self, name: &str) -> InstrumentBuilder<Histogram> {
        InstrumentBuilder::new(&self.name, name)
    }
}

#[derive(Debug)]
pub struct InstrumentBuilder<T> {
    meter: String,
    name: String,
    description: Option<String>,
    _kind: std::marker::PhantomData<T>,
}

impl<T> InstrumentBuilder<T> {
    fn new(meter: &str, name: &str) -> Self {
        Self {
            meter: meter.to_string(),
            name: name.to_string(),
            description: None,
            _kind: std::marker::PhantomData,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

impl InstrumentBuilder<Counter> {
    pub fn build(self) -> Counter {
        Counter {
            meter: self.meter,
            name: self.name,
        }
    }
}

impl InstrumentBuilder<Histogram> {
    pub fn build(self) -> Histogram {
        Histogram {
            meter: self.meter,
            name: self.name,
        }
    }
}

fn render(attributes: &[KeyValue]) -> String {
    attributes
        .iter()
        .map(|kv| format!("{}={}", kv.key, kv.value))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug)]
pub struct Counter {
    meter: String,
    name: String,
}

impl Counter {
    pub fn add(&self, value: u64, attributes: &[KeyValue]) {
        tracing::debug!(
            meter = %self.meter,
            counter = %self.name,
            value,
            attributes = %render(attributes),
            "Counter incremented"
        );
    }
}

#[derive(Debug)]
pub struct Histogram {
    meter: String,
    name: String,
}

impl Histogram {
    pub fn record(&self, value: f64, attributes: &[KeyValue]) {
        tracing::debug!(
            meter = %self.meter,
            histogram = %self.name,
            value,
            attributes = %render(attributes),
            "Histogram recorded"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_render_as_pairs() {
        let rendered = render(&[
            KeyValue::new("operation", "save"),
            KeyValue::new("success", true),
        ]);
        assert_eq!(rendered, "operation=save,success=true");
    }

    #[test]
    fn instruments_keep_their_names() {
        let counter = get_meter("profile-persistence")
            .u64_counter("profile_writes_total")
            .with_description("writes")
            .build();
        assert_eq!(counter.meter, "profile-persistence");
        assert_eq!(counter.name, "profile_writes_total");
        counter.add(1, &[]);
    }
}
