//! Response construction helpers.
//!
//! Every body the server produces is JSON; these helpers set the content
//! type and fall back to an empty body if the builder ever rejects a part.

use bytes::Bytes;
use http::header::{ALLOW, CONTENT_TYPE};
use http::{Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;

/// Type alias for the HTTP response body.
pub type ResponseBody = Full<Bytes>;

/// Type alias for the HTTP response.
pub type HttpResponse = Response<ResponseBody>;

/// The JSON content type.
pub const APPLICATION_JSON: &str = "application/json";

/// Serializes `body` as a JSON response with `status`.
pub fn json<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    match serde_json::to_vec(body) {
        Ok(bytes) => with_body(status, Bytes::from(bytes)),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response body");
            error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "SERIALIZATION_ERROR",
                "failed to serialize response",
            )
        }
    }
}

/// `{"error": {"code", "message"}}` with `status`.
pub fn error(status: StatusCode, code: &str, message: &str) -> HttpResponse {
    let body = serde_json::json!({
        "error": {
            "code": code,
            "message": message
        }
    });
    with_body(status, Bytes::from(body.to_string()))
}

/// 404 for an unknown path.
pub fn not_found(path: &str) -> HttpResponse {
    let body = serde_json::json!({
        "error": "Not Found",
        "path": path
    });
    with_body(StatusCode::NOT_FOUND, Bytes::from(body.to_string()))
}

/// 405 advertising the methods a path supports.
pub fn method_not_allowed(allow: &'static str) -> HttpResponse {
    let mut response = error(
        StatusCode::METHOD_NOT_ALLOWED,
        "METHOD_NOT_ALLOWED",
        &format!("only {allow} is supported on this path"),
    );
    response
        .headers_mut()
        .insert(ALLOW, http::HeaderValue::from_static(allow));
    response
}

/// A bodiless response, used for preflight replies.
pub fn empty(status: StatusCode) -> HttpResponse {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}

fn with_body(status: StatusCode, body: Bytes) -> HttpResponse {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, APPLICATION_JSON)
        .body(Full::new(body))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}
