//! # Numeris Server
//!
//! HTTP front end for the Numeris number classification service.
//!
//! - [`Server`] - Hyper/Tokio server with graceful shutdown
//! - [`NumberClassifier`] - Validation, classification, and fact lookup
//! - [`CorsPolicy`] - Startup-configured cross-origin policy
//! - [`HealthCheck`] / [`ReadinessCheck`] - `/health` and `/ready` probes
//!
//! ## Endpoints
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | `GET` | `/api/classify-number?number=<n>` | `200` result or `400` validation error |
//! | `GET` | `/health` | liveness status |
//! | `GET` | `/ready` | `200`, or `503` while shutting down |
//!
//! ## Example
//!
//! ```rust,no_run
//! use numeris_config::ConfigLoader;
//! use numeris_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new().with_defaults().load()?;
//!     Server::from_config(&config)?.run().await?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/numeris-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod classifier;
mod config;
mod cors;
mod error;
mod health;
pub mod response;
mod router;
mod server;
pub mod shutdown;
mod telemetry;

pub use classifier::{number_param, NumberClassifier, NUMBER_PARAM};
pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SERVICE_NAME, DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
pub use cors::{AllowList, AllowedOrigins, CorsPolicy};
pub use error::ServerError;
pub use health::{HealthCheck, HealthStatus, ReadinessCheck, ReadinessStatus};
pub use response::{HttpResponse, ResponseBody};
pub use router::{Route, CLASSIFY_PATH, HEALTH_PATH, READY_PATH};
pub use server::{Server, ServerBuilder, REQUEST_ID_HEADER};
pub use shutdown::{ConnectionTracker, ShutdownSignal};
pub use telemetry::telemetry_config;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
