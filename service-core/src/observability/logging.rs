use opentelemetry::KeyValue;
use opentelemetry::trace::TraceError;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{Resource, runtime, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn otlp_tracer(service_name: &str, endpoint: &str) -> Result<sdktrace::Tracer, TraceError> {
    let otlp_exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(otlp_exporter)
        .with_trace_config(sdktrace::config().with_resource(Resource::new(vec![
            KeyValue::new("service.name", service_name.to_string()),
        ])))
        .install_batch(runtime::Tokio)
}

/// Install the global subscriber: JSON logs filtered by `RUST_LOG` (falling back
/// to `log_level`), plus an OTLP span exporter when `otlp_endpoint` is given.
pub fn init_tracing(service_name: &str, log_level: &str, otlp_endpoint: Option<&str>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let (telemetry, otlp_error) = match otlp_endpoint.map(|e| otlp_tracer(service_name, e)) {
        Some(Ok(tracer)) => (Some(tracing_opentelemetry::layer().with_tracer(tracer)), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(telemetry)
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .json()
                .flatten_event(true),
        )
        .init();

    // Logging stays up even when the collector pipeline could not be built.
    if let Some(e) = otlp_error {
        tracing::warn!(
            service = service_name,
            endpoint = otlp_endpoint.unwrap_or_default(),
            error = %e,
            "OTLP exporter unavailable, spans will not be exported"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The global subscriber can be installed once per process, so this is the
    // only test in the crate that calls `init_tracing`.
    #[tokio::test]
    async fn installs_subscriber_with_otlp_exporter() {
        init_tracing("service-core-test", "debug", Some("http://127.0.0.1:4317"));

        assert!(tracing::dispatcher::has_been_set());
        tracing::info_span!("exported_span").in_scope(|| tracing::info!("inside span"));
    }

    #[tokio::test]
    async fn builds_otlp_tracer_for_endpoint() {
        assert!(otlp_tracer("service-core-test", "http://127.0.0.1:4317").is_ok());
    }
}
