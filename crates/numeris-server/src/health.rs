//! Liveness and readiness probes.
//!
//! - `/health` reports that the process is up, with its identity and uptime.
//! - `/ready` reports whether the server accepts traffic; it flips to
//!   `false` once graceful shutdown starts.
//!
//! ```rust
//! use numeris_server::{HealthCheck, ReadinessCheck};
//!
//! let health = HealthCheck::new("numeris", "0.1.0");
//! assert_eq!(health.status().status(), "healthy");
//!
//! let readiness = ReadinessCheck::new();
//! assert!(readiness.is_ready());
//! readiness.set_ready(false);
//! assert!(!readiness.status().is_ready());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Body of the `/health` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    status: String,
    service: String,
    version: String,
    uptime_seconds: u64,
}

impl HealthStatus {
    /// A healthy status for the given service.
    pub fn healthy(service: impl Into<String>, version: impl Into<String>, uptime: Duration) -> Self {
        Self {
            status: "healthy".to_string(),
            service: service.into(),
            version: version.into(),
            uptime_seconds: uptime.as_secs(),
        }
    }

    /// Status string.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Service name.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Service version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Whole seconds since start.
    #[must_use]
    pub fn uptime_seconds(&self) -> u64 {
        self.uptime_seconds
    }
}

/// Liveness probe.
#[derive(Debug, Clone)]
pub struct HealthCheck {
    service: String,
    version: String,
    start_time: Instant,
}

impl HealthCheck {
    /// Creates a probe; uptime counts from now.
    pub fn new(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            version: version.into(),
            start_time: Instant::now(),
        }
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> HealthStatus {
        HealthStatus::healthy(&self.service, &self.version, self.uptime())
    }

    /// Time since the probe was created.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Service name.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Service version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Body of the `/ready` endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadinessStatus {
    ready: bool,
}

impl ReadinessStatus {
    /// Whether the server accepts traffic.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

/// Readiness probe backed by a shared flag.
///
/// Clones share the flag, so the server can flip it while request tasks
/// read it.
#[derive(Debug, Clone)]
pub struct ReadinessCheck {
    ready: Arc<AtomicBool>,
}

impl ReadinessCheck {
    /// Creates a probe that starts ready.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Whether the server accepts traffic.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> ReadinessStatus {
        ReadinessStatus {
            ready: self.is_ready(),
        }
    }

    /// Sets the flag.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }
}

impl Default for ReadinessCheck {
    fn default() -> Self {
        Self::new()
    }
}
