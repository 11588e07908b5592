//! Request routing.
//!
//! The service exposes a fixed set of paths, so routing is a match on
//! method and path rather than a table. Path comparison ignores ASCII
//! case and a trailing slash.
//!
//! | Path | Method | Route |
//! |------|--------|-------|
//! | any | `OPTIONS` + CORS request headers | [`Route::Preflight`] |
//! | `/api/classify-number` | `GET` | [`Route::Classify`] |
//! | `/health` | `GET` | [`Route::Health`] |
//! | `/ready` | `GET` | [`Route::Ready`] |
//! | any of the above | other | [`Route::MethodNotAllowed`] |
//! | anything else | any | [`Route::NotFound`] |

use http::{HeaderMap, Method};

use crate::cors::CorsPolicy;

/// Path of the classification endpoint.
pub const CLASSIFY_PATH: &str = "/api/classify-number";

/// Path of the liveness probe.
pub const HEALTH_PATH: &str = "/health";

/// Path of the readiness probe.
pub const READY_PATH: &str = "/ready";

/// A resolved route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// CORS preflight for any path.
    Preflight,
    /// `GET /api/classify-number`.
    Classify,
    /// `GET /health`.
    Health,
    /// `GET /ready`.
    Ready,
    /// Known path, unsupported method.
    MethodNotAllowed {
        /// Value for the `Allow` header.
        allow: &'static str,
    },
    /// Unknown path.
    NotFound,
}

impl Route {
    /// Resolves a request to a route.
    ///
    /// ```rust
    /// use http::{HeaderMap, Method};
    /// use numeris_server::Route;
    ///
    /// let headers = HeaderMap::new();
    /// assert_eq!(Route::resolve(&Method::GET, "/api/classify-number", &headers), Route::Classify);
    /// assert_eq!(Route::resolve(&Method::GET, "/nope", &headers), Route::NotFound);
    /// ```
    pub fn resolve(method: &Method, path: &str, headers: &HeaderMap) -> Self {
        if CorsPolicy::is_preflight(method, headers) {
            return Self::Preflight;
        }

        // Paths match case-insensitively and ignore a trailing slash.
        let path = path.trim_end_matches('/');
        let route = if path.eq_ignore_ascii_case(CLASSIFY_PATH) {
            Self::Classify
        } else if path.eq_ignore_ascii_case(HEALTH_PATH) {
            Self::Health
        } else if path.eq_ignore_ascii_case(READY_PATH) {
            Self::Ready
        } else {
            return Self::NotFound;
        };

        if method == Method::GET {
            route
        } else {
            Self::MethodNotAllowed { allow: "GET" }
        }
    }

    /// Low-cardinality label for metrics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Preflight => "preflight",
            Self::Classify => "classify",
            Self::Health => "health",
            Self::Ready => "ready",
            Self::MethodNotAllowed { .. } => "method_not_allowed",
            Self::NotFound => "not_found",
        }
    }
}
