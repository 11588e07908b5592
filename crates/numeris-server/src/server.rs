//! HTTP server.
//!
//! One Tokio task per connection, HTTP/1.1 via Hyper. Every request runs
//! through the same pipeline:
//!
//! 1. Resolve the [`Route`] (CORS preflight first).
//! 2. Open the `request` span and the OpenTelemetry server span.
//! 3. Run the route under the request timeout (`504` on expiry).
//! 4. Stamp `x-request-id`, content type, and CORS headers; record metrics.
//!
//! # Example
//!
//! ```rust,no_run
//! use numeris_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::builder().http_addr("0.0.0.0:8080").build();
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use http::header::{CONTENT_TYPE, ORIGIN};
use http::{HeaderMap, HeaderValue, Method, Request, StatusCode, Uri};
use hyper::body::{Body as _, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use numeris_config::NumerisConfig;
use numeris_facts::{FactFetcher, NumbersApiClient};
use numeris_telemetry::metrics::record_request;
use numeris_telemetry::{InFlightGuard, RequestTrace};
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::classifier::{number_param, NumberClassifier};
use crate::config::{ServerConfig, ServerConfigBuilder};
use crate::cors::CorsPolicy;
use crate::error::ServerError;
use crate::health::{HealthCheck, ReadinessCheck};
use crate::response::{self, HttpResponse, APPLICATION_JSON};
use crate::router::Route;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Request correlation header.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// Longest inbound request id that is propagated as-is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// The Numeris HTTP server.
pub struct Server {
    config: ServerConfig,
    classifier: NumberClassifier,
    cors: CorsPolicy,
    health: HealthCheck,
    readiness: ReadinessCheck,
}

impl Server {
    /// Creates a server with no fact source and a permissive CORS policy.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Creates a new server builder.
    #[must_use]
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Wires a server from loaded configuration.
    ///
    /// Builds the shared Numbers API client when facts are enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the fact client or the CORS policy cannot be
    /// built.
    pub fn from_config(config: &NumerisConfig) -> Result<Self, ServerError> {
        let fetcher = if config.facts.enabled {
            let client = NumbersApiClient::builder()
                .base_url(config.facts.base_url.clone())
                .timeout(config.facts_timeout())
                .pool_max_idle_per_host(config.facts.pool_max_idle_per_host)
                .build()?;
            FactFetcher::new(Arc::new(client), config.facts_timeout())
        } else {
            FactFetcher::disabled()
        };

        Ok(Self::builder()
            .config(ServerConfig::from(config))
            .fact_fetcher(fetcher)
            .cors(CorsPolicy::from_section(&config.cors)?)
            .build())
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the classifier.
    #[must_use]
    pub fn classifier(&self) -> &NumberClassifier {
        &self.classifier
    }

    /// Returns the CORS policy.
    #[must_use]
    pub fn cors(&self) -> &CorsPolicy {
        &self.cors
    }

    /// Returns the liveness probe.
    #[must_use]
    pub fn health(&self) -> &HealthCheck {
        &self.health
    }

    /// Returns the readiness probe. Clones share the flag.
    #[must_use]
    pub fn readiness(&self) -> &ReadinessCheck {
        &self.readiness
    }

    /// Runs until SIGTERM or SIGINT.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or cannot be bound.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Binds the configured address and serves until `shutdown` fires.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or cannot be bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self
            .config
            .socket_addr()
            .map_err(|e| ServerError::InvalidAddress {
                addr: self.config.http_addr().to_string(),
                reason: e.to_string(),
            })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener.
    ///
    /// On shutdown the server stops accepting, reports not-ready, and waits
    /// up to the shutdown timeout for open connections to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener's local address cannot be read.
    pub async fn serve(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        info!(addr = %listener.local_addr()?, "server listening");

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, remote_addr)) => {
                            let server = Arc::clone(&server);
                            let token = tracker.acquire();
                            let shutdown = shutdown.clone();

                            tokio::spawn(async move {
                                if let Err(e) = server.handle_connection(stream, remote_addr, shutdown).await {
                                    tracing::debug!(%remote_addr, error = %e, "connection error");
                                }
                                drop(token);
                            });
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "failed to accept connection");
                        }
                    }
                }

                () = shutdown.recv() => {
                    info!("shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }

        server.readiness.set_ready(false);

        let shutdown_timeout = server.config.shutdown_timeout();
        info!(
            timeout_ms = duration_ms(shutdown_timeout),
            active = tracker.active_connections(),
            "draining connections"
        );

        tokio::select! {
            () = tracker.wait_for_shutdown() => {
                info!("all connections closed");
            }
            () = tokio::time::sleep(shutdown_timeout) => {
                warn!(
                    active = tracker.active_connections(),
                    "shutdown timeout reached, dropping remaining connections"
                );
            }
        }

        info!("server stopped");
        Ok(())
    }

    async fn handle_connection(
        self: &Arc<Self>,
        stream: TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let io = TokioIo::new(stream);
        let server = Arc::clone(self);

        let service = service_fn(move |req: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { server.handle_request(req).await }
        });

        let conn = http1::Builder::new().serve_connection(io, service);
        tokio::pin!(conn);

        tokio::select! {
            result = conn.as_mut() => result,
            () = shutdown.recv() => {
                // Finish the in-flight request, then close.
                tracing::debug!(%remote_addr, "closing connection for shutdown");
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        }
    }

    async fn handle_request(&self, req: Request<Incoming>) -> Result<HttpResponse, Infallible> {
        let (parts, _body) = req.into_parts();
        Ok(self.dispatch(&parts.method, &parts.uri, &parts.headers).await)
    }

    /// Runs one request through the full pipeline.
    ///
    /// Exposed so the pipeline can be exercised without a socket.
    pub async fn dispatch(&self, method: &Method, uri: &Uri, headers: &HeaderMap) -> HttpResponse {
        let start = Instant::now();
        let _in_flight = InFlightGuard::new();

        let request_id = request_id(headers);
        let path = uri.path();
        let route = Route::resolve(method, path, headers);

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %method,
            path = %path,
        );
        let trace = RequestTrace::start(method, path, headers);

        let routed = RequestTrace::instrument(
            &trace,
            tokio::time::timeout(
                self.config.request_timeout(),
                self.route(route, uri, headers),
            ),
        )
        .instrument(span.clone())
            .await;

        let mut response = routed.unwrap_or_else(|_| {
            warn!(
                parent: &span,
                timeout_ms = duration_ms(self.config.request_timeout()),
                "request timed out"
            );
            response::error(
                StatusCode::GATEWAY_TIMEOUT,
                "REQUEST_TIMEOUT",
                "request did not complete in time",
            )
        });

        self.finish_response(&mut response, route, &request_id, headers.get(ORIGIN));

        let status = response.status().as_u16();
        let elapsed = start.elapsed();
        info!(
            parent: &span,
            status,
            duration_ms = duration_ms(elapsed),
            "request completed"
        );
        record_request(route.label(), status, elapsed);
        trace.finish(status);

        response
    }

    async fn route(&self, route: Route, uri: &Uri, headers: &HeaderMap) -> HttpResponse {
        match route {
            Route::Preflight => self.cors.preflight(headers),
            Route::Classify => self.handle_classify(uri.query()).await,
            Route::Health => response::json(StatusCode::OK, &self.health.status()),
            Route::Ready => {
                let status = self.readiness.status();
                let code = if status.is_ready() {
                    StatusCode::OK
                } else {
                    StatusCode::SERVICE_UNAVAILABLE
                };
                response::json(code, &status)
            }
            Route::MethodNotAllowed { allow } => response::method_not_allowed(allow),
            Route::NotFound => response::not_found(uri.path()),
        }
    }

    async fn handle_classify(&self, query: Option<&str>) -> HttpResponse {
        let raw = number_param(query);
        match self.classifier.classify(raw.as_deref()).await {
            Ok(result) => response::json(StatusCode::OK, &result),
            Err(e) => response::json(e.status_code(), &e.to_body()),
        }
    }

    fn finish_response(
        &self,
        response: &mut HttpResponse,
        route: Route,
        request_id: &str,
        origin: Option<&HeaderValue>,
    ) {
        if route != Route::Preflight {
            self.cors.apply(origin, response);
        }

        let has_body = !response.body().is_end_stream();
        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(request_id) {
            headers.insert(REQUEST_ID_HEADER, value);
        }
        if has_body && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        }
    }
}

/// Propagates a usable inbound `x-request-id`, or mints a UUID v7.
fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(|| Uuid::now_v7().to_string(), ToString::to_string)
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Builder for [`Server`].
#[derive(Default)]
pub struct ServerBuilder {
    config_builder: ServerConfigBuilder,
    config: Option<ServerConfig>,
    fetcher: Option<FactFetcher>,
    cors: Option<CorsPolicy>,
}

impl ServerBuilder {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a complete configuration, replacing individual settings.
    #[must_use]
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the HTTP bind address.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.http_addr(addr);
        self
    }

    /// Sets the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.shutdown_timeout(timeout);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.request_timeout(timeout);
        self
    }

    /// Sets the service name for health checks.
    #[must_use]
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.service_name(name);
        self
    }

    /// Sets the service version for health checks.
    #[must_use]
    pub fn service_version(mut self, version: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.service_version(version);
        self
    }

    /// Sets the fact fetcher. Defaults to [`FactFetcher::disabled`].
    #[must_use]
    pub fn fact_fetcher(mut self, fetcher: FactFetcher) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Sets the CORS policy. Defaults to [`CorsPolicy::permissive`].
    #[must_use]
    pub fn cors(mut self, cors: CorsPolicy) -> Self {
        self.cors = Some(cors);
        self
    }

    /// Builds the server.
    #[must_use]
    pub fn build(self) -> Server {
        let config = self
            .config
            .unwrap_or_else(|| self.config_builder.build());
        let health = HealthCheck::new(config.service_name(), config.service_version());

        Server {
            config,
            classifier: NumberClassifier::new(self.fetcher.unwrap_or_else(FactFetcher::disabled)),
            cors: self.cors.unwrap_or_default(),
            health,
            readiness: ReadinessCheck::new(),
        }
    }
}
