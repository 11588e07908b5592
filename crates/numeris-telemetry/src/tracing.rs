//! OpenTelemetry distributed tracing.
//!
//! When enabled, [`init_tracing`] installs an OTLP (gRPC) span exporter and
//! the W3C trace-context propagator. Each HTTP request is wrapped in a
//! [`RequestTrace`], whose context is current while the request is handled,
//! so outbound calls made through [`inject_current_context`] carry a
//! `traceparent` header. With tracing disabled every function here is a
//! cheap no-op.

use std::future::Future;

use opentelemetry::propagation::{Extractor, Injector};
use opentelemetry::trace::{
    FutureExt, SpanKind, Status, TraceContextExt, Tracer, WithContext,
};
use opentelemetry::{global, Context, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{RandomIdGenerator, Sampler, TracerProvider};
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions::attribute;

use crate::error::TelemetryError;
use crate::TelemetryResult;

const TRACER_NAME: &str = "numeris";

/// Tracing configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Whether spans are exported.
    pub enabled: bool,

    /// OTLP gRPC endpoint.
    pub otlp_endpoint: String,

    /// Service name resource attribute.
    pub service_name: String,

    /// Service version resource attribute.
    pub service_version: String,

    /// Deployment environment resource attribute.
    pub environment: String,

    /// Fraction of root traces to sample, `0.0..=1.0`.
    pub sampling_ratio: f64,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: "http://localhost:4317".to_string(),
            service_name: "numeris".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
            sampling_ratio: 1.0,
        }
    }
}

fn sampler(ratio: f64) -> Sampler {
    let root = if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(ratio)
    };
    // Honour the caller's decision for propagated traces.
    Sampler::ParentBased(Box::new(root))
}

/// Installs the OTLP exporter and the W3C propagator.
///
/// Returns the provider so the caller can flush it on shutdown, or `None`
/// when tracing is disabled.
///
/// # Errors
///
/// Returns [`TelemetryError::TracingInit`] if the exporter cannot be built.
pub fn init_tracing(config: &TracingConfig) -> TelemetryResult<Option<TracerProvider>> {
    if !config.enabled {
        return Ok(None);
    }

    let resource = Resource::new([
        KeyValue::new(attribute::SERVICE_NAME, config.service_name.clone()),
        KeyValue::new(attribute::SERVICE_VERSION, config.service_version.clone()),
        KeyValue::new("deployment.environment", config.environment.clone()),
    ]);

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&config.otlp_endpoint)
        .build()
        .map_err(|e| TelemetryError::TracingInit(e.to_string()))?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_sampler(sampler(config.sampling_ratio))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource)
        .build();

    global::set_text_map_propagator(TraceContextPropagator::new());
    global::set_tracer_provider(provider.clone());

    tracing::info!(endpoint = %config.otlp_endpoint, "OTLP tracing enabled");
    Ok(Some(provider))
}

/// Reads a remote parent context from request headers.
pub fn extract_context(headers: &http::HeaderMap) -> Context {
    global::get_text_map_propagator(|propagator| propagator.extract(&HeaderExtractor(headers)))
}

/// Writes the current context into outbound request headers.
pub fn inject_current_context(headers: &mut http::HeaderMap) {
    let cx = Context::current();
    global::get_text_map_propagator(|propagator| {
        propagator.inject_context(&cx, &mut HeaderInjector(headers));
    });
}

/// The server span of one HTTP request.
///
/// ```rust,ignore
/// let trace = RequestTrace::start(&method, path, &headers);
/// let response = trace.instrument(handle(request)).await;
/// trace.finish(response.status().as_u16());
/// ```
#[derive(Debug)]
pub struct RequestTrace {
    cx: Context,
}

impl RequestTrace {
    /// Starts a server span, parented on any propagated context.
    pub fn start(method: &http::Method, path: &str, headers: &http::HeaderMap) -> Self {
        let parent = extract_context(headers);
        let tracer = global::tracer(TRACER_NAME);
        let span = tracer
            .span_builder(format!("{method} {path}"))
            .with_kind(SpanKind::Server)
            .with_attributes([
                KeyValue::new(attribute::HTTP_REQUEST_METHOD, method.to_string()),
                KeyValue::new(attribute::URL_PATH, path.to_string()),
            ])
            .start_with_context(&tracer, &parent);

        Self {
            cx: parent.with_span(span),
        }
    }

    /// Runs `future` with this trace as the current context.
    pub fn instrument<F: Future>(&self, future: F) -> WithContext<F> {
        future.with_context(self.cx.clone())
    }

    /// Records the response status and ends the span.
    pub fn finish(self, status: u16) {
        let span = self.cx.span();
        span.set_attribute(KeyValue::new(
            attribute::HTTP_RESPONSE_STATUS_CODE,
            i64::from(status),
        ));
        if status >= 500 {
            span.set_status(Status::error(format!("HTTP {status}")));
        }
        span.end();
    }
}

/// Adapts an [`http::HeaderMap`] for context extraction.
pub struct HeaderExtractor<'a>(pub &'a http::HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(http::HeaderName::as_str).collect()
    }
}

/// Adapts an [`http::HeaderMap`] for context injection.
pub struct HeaderInjector<'a>(pub &'a mut http::HeaderMap);

impl Injector for HeaderInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        if let (Ok(name), Ok(value)) = (
            http::header::HeaderName::try_from(key),
            http::header::HeaderValue::try_from(value),
        ) {
            self.0.insert(name, value);
        }
    }
}
