//! Cross-origin resource sharing.
//!
//! The policy is built once at startup from [`CorsSection`] and never
//! changes. Preflight requests are answered before routing; every other
//! response gets the allow-origin header when the request carried an
//! allowed `Origin`.
//!
//! # Example
//!
//! ```rust
//! use numeris_config::CorsSection;
//! use numeris_server::CorsPolicy;
//!
//! let policy = CorsPolicy::from_section(&CorsSection::default()).unwrap();
//! assert!(policy.allowed_origins().is_allowed("https://anywhere.example"));
//! ```

use std::collections::HashSet;
use std::time::Duration;

use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_EXPOSE_HEADERS, ACCESS_CONTROL_MAX_AGE, ACCESS_CONTROL_REQUEST_HEADERS,
    ACCESS_CONTROL_REQUEST_METHOD, ORIGIN, VARY,
};
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use numeris_config::CorsSection;

use crate::error::ServerError;
use crate::response::{self, HttpResponse};

const WILDCARD: &str = "*";

// Methods advertised when every method is allowed.
const ALL_METHODS: &str = "DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT";

// Response headers scripts may read.
const EXPOSED_HEADERS: &str = "x-request-id";

/// Origins the policy accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    /// Any origin; answered with `*`.
    Any,
    /// Exactly these origins; answered by echoing the origin.
    List(HashSet<String>),
}

impl AllowedOrigins {
    /// Checks if an origin is allowed.
    pub fn is_allowed(&self, origin: &str) -> bool {
        match self {
            Self::Any => true,
            Self::List(origins) => origins.contains(origin),
        }
    }

    /// The `Access-Control-Allow-Origin` value for `origin`, if allowed.
    pub fn header_value(&self, origin: &str) -> Option<HeaderValue> {
        match self {
            Self::Any => Some(HeaderValue::from_static(WILDCARD)),
            Self::List(origins) if origins.contains(origin) => HeaderValue::from_str(origin).ok(),
            Self::List(_) => None,
        }
    }
}

/// Methods or headers the policy accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowList<T> {
    /// Everything.
    Any,
    /// Only these entries, in configured order.
    Only(Vec<T>),
}

impl<T: PartialEq> AllowList<T> {
    fn contains(&self, item: &T) -> bool {
        match self {
            Self::Any => true,
            Self::Only(items) => items.contains(item),
        }
    }

    fn only(entries: impl IntoIterator<Item = T>) -> Self {
        let mut items = Vec::new();
        for entry in entries {
            if !items.contains(&entry) {
                items.push(entry);
            }
        }
        Self::Only(items)
    }
}

/// Process-wide cross-origin policy.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origins: AllowedOrigins,
    allowed_methods: AllowList<Method>,
    // lowercase
    allowed_headers: AllowList<String>,
    max_age: Option<Duration>,
}

impl CorsPolicy {
    /// Allows every origin, method, and header.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            allowed_origins: AllowedOrigins::Any,
            allowed_methods: AllowList::Any,
            allowed_headers: AllowList::Any,
            max_age: Some(Duration::from_secs(86_400)),
        }
    }

    /// Builds the policy from configuration.
    ///
    /// `"*"` anywhere in the method or header list allows everything.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Cors`] for an unparseable method name.
    pub fn from_section(section: &CorsSection) -> Result<Self, ServerError> {
        let allowed_origins = if section.allow_any_origin {
            AllowedOrigins::Any
        } else {
            AllowedOrigins::List(section.allowed_origins.iter().cloned().collect())
        };

        let allowed_methods = if section.allowed_methods.iter().any(|m| m == WILDCARD) {
            AllowList::Any
        } else {
            let methods = section
                .allowed_methods
                .iter()
                .map(|m| {
                    Method::from_bytes(m.trim().to_ascii_uppercase().as_bytes())
                        .map_err(|_| ServerError::Cors(format!("invalid method '{m}'")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            AllowList::only(methods)
        };

        let allowed_headers = if section.allowed_headers.iter().any(|h| h == WILDCARD) {
            AllowList::Any
        } else {
            AllowList::only(
                section
                    .allowed_headers
                    .iter()
                    .map(|h| h.trim().to_ascii_lowercase()),
            )
        };

        let max_age = (section.max_age_secs > 0).then(|| Duration::from_secs(section.max_age_secs));

        Ok(Self {
            allowed_origins,
            allowed_methods,
            allowed_headers,
            max_age,
        })
    }

    /// Returns the origin rule.
    #[must_use]
    pub fn allowed_origins(&self) -> &AllowedOrigins {
        &self.allowed_origins
    }

    /// `OPTIONS` with both `Origin` and `Access-Control-Request-Method`.
    pub fn is_preflight(method: &Method, headers: &HeaderMap) -> bool {
        method == Method::OPTIONS
            && headers.contains_key(ORIGIN)
            && headers.contains_key(ACCESS_CONTROL_REQUEST_METHOD)
    }

    /// Answers a preflight request: 204 with the allow headers, or 403.
    pub fn preflight(&self, headers: &HeaderMap) -> HttpResponse {
        let Some(origin) = header_str(headers, &ORIGIN) else {
            return forbidden("missing or invalid Origin header");
        };
        let Some(allow_origin) = self.allowed_origins.header_value(origin) else {
            return forbidden("origin not allowed");
        };

        let requested_method = header_str(headers, &ACCESS_CONTROL_REQUEST_METHOD)
            .and_then(|m| Method::from_bytes(m.trim().as_bytes()).ok());
        match requested_method {
            Some(method) if self.allowed_methods.contains(&method) => {}
            _ => return forbidden("method not allowed"),
        }

        let requested_headers = header_str(headers, &ACCESS_CONTROL_REQUEST_HEADERS);
        if let (AllowList::Only(_), Some(requested)) = (&self.allowed_headers, requested_headers) {
            for header in requested.split(',').map(|h| h.trim().to_ascii_lowercase()) {
                if !header.is_empty() && !self.allowed_headers.contains(&header) {
                    return forbidden(&format!("header '{header}' not allowed"));
                }
            }
        }

        let mut response = response::empty(StatusCode::NO_CONTENT);
        let out = response.headers_mut();
        out.insert(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);

        let methods = match &self.allowed_methods {
            AllowList::Any => HeaderValue::from_static(ALL_METHODS),
            AllowList::Only(methods) => join(methods.iter().map(Method::as_str)),
        };
        out.insert(ACCESS_CONTROL_ALLOW_METHODS, methods);

        // Any-header policies echo what was asked for.
        let allow_headers = match (&self.allowed_headers, requested_headers) {
            (AllowList::Any, Some(requested)) => HeaderValue::from_str(requested).ok(),
            (AllowList::Any, None) => None,
            (AllowList::Only(allowed), _) if allowed.is_empty() => None,
            (AllowList::Only(allowed), _) => Some(join(allowed.iter().map(String::as_str))),
        };
        if let Some(value) = allow_headers {
            out.insert(ACCESS_CONTROL_ALLOW_HEADERS, value);
        }

        if let Some(max_age) = self.max_age {
            out.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from(max_age.as_secs()));
        }

        if matches!(self.allowed_origins, AllowedOrigins::List(_)) {
            out.append(VARY, HeaderValue::from_static("Origin"));
        }
        response
    }

    /// Adds allow-origin headers to a non-preflight response.
    pub fn apply(&self, origin: Option<&HeaderValue>, response: &mut HttpResponse) {
        let headers = response.headers_mut();
        if matches!(self.allowed_origins, AllowedOrigins::List(_)) {
            headers.append(VARY, HeaderValue::from_static("Origin"));
        }

        let Some(origin) = origin.and_then(|v| v.to_str().ok()) else {
            return;
        };
        if let Some(value) = self.allowed_origins.header_value(origin) {
            headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
            headers.insert(
                ACCESS_CONTROL_EXPOSE_HEADERS,
                HeaderValue::from_static(EXPOSED_HEADERS),
            );
        }
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::permissive()
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &http::HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn join<'a>(items: impl Iterator<Item = &'a str>) -> HeaderValue {
    let joined = items.collect::<Vec<_>>().join(", ");
    HeaderValue::from_str(&joined).unwrap_or_else(|_| HeaderValue::from_static(""))
}

fn forbidden(message: &str) -> HttpResponse {
    tracing::debug!(reason = message, "rejected CORS preflight");
    response::error(StatusCode::FORBIDDEN, "CORS_FORBIDDEN", message)
}
