//! Shared helpers: a fake Numbers API and a server on an ephemeral port.

#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;

use bytes::Bytes;
use http::{Request, Response, StatusCode};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use numeris_config::NumerisConfig;
use numeris_server::{ReadinessCheck, Server, ServerError, ShutdownSignal};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

fn json(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .unwrap()
}

async fn fake_numbers_api(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let response = match (req.uri().path(), req.uri().query()) {
        ("/153/math", Some("json")) => json(
            StatusCode::OK,
            r#"{"text":"153 is a narcissistic number.","number":153,"found":true}"#,
        ),
        ("/28/math", Some("json")) => json(
            StatusCode::OK,
            r#"{"text":"28 is the second perfect number.","number":28,"found":true}"#,
        ),
        ("/-371/math", Some("json")) => json(StatusCode::OK, r#"{"text":"-371 is negative."}"#),
        ("/4/math", Some("json")) => json(StatusCode::OK, r#"{"found":false}"#),
        _ => json(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"boom"}"#),
    };
    Ok(response)
}

/// Starts the fake Numbers API and returns its base URL.
pub async fn spawn_numbers_api() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service_fn(fake_numbers_api))
                    .await;
            });
        }
    });

    format!("http://{addr}")
}

/// A base URL nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Configuration pointing facts at `base_url`, with quiet logs.
pub fn config_with_facts(base_url: String) -> NumerisConfig {
    let mut config = NumerisConfig::default();
    config.server.http_addr = "127.0.0.1:0".to_string();
    config.server.shutdown_timeout_secs = 1;
    config.facts.base_url = base_url;
    config.facts.timeout_ms = 1000;
    config
}

/// A running server.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: ShutdownSignal,
    pub readiness: ReadinessCheck,
    handle: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }

    /// Triggers shutdown and waits for the server to stop.
    pub async fn stop(self) -> Result<(), ServerError> {
        self.shutdown.trigger();
        self.handle.await.unwrap()
    }
}

/// Builds a server from `config` and serves it on an ephemeral port.
pub async fn spawn_server(config: &NumerisConfig) -> TestServer {
    let server = Server::from_config(config).unwrap();
    let readiness = server.readiness().clone();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = ShutdownSignal::new();

    let handle = tokio::spawn(server.serve(listener, shutdown.clone()));

    TestServer {
        addr,
        shutdown,
        readiness,
        handle,
    }
}

/// Server with facts served by the fake Numbers API.
pub async fn spawn_default() -> TestServer {
    let base_url = spawn_numbers_api().await;
    spawn_server(&config_with_facts(base_url)).await
}
