//! Error types for fact lookups.
//!
//! None of these errors ever reach an HTTP caller: [`crate::FactFetcher`]
//! turns every one of them into [`crate::FactLookup::Fallback`].

use std::time::Duration;

use thiserror::Error;

/// Result type for fact sources.
pub type FactResult<T> = Result<T, FactError>;

/// Errors raised while fetching a fact.
#[derive(Debug, Error)]
pub enum FactError {
    /// The HTTP client could not be constructed.
    #[error("failed to build fact client: {message}")]
    ClientBuild {
        /// Error message.
        message: String,
    },

    /// The request could not be sent or the body could not be read.
    #[error("fact request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The fact service answered with a non-success status.
    #[error("fact service returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response body was not the expected JSON document.
    #[error("invalid fact response: {0}")]
    Decode(#[source] reqwest::Error),

    /// The response parsed but carried no `text` field.
    #[error("fact response has no text")]
    MissingText,

    /// The lookup did not finish in time.
    #[error("fact lookup timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl FactError {
    /// Creates a client build error.
    pub fn client_build(message: impl Into<String>) -> Self {
        Self::ClientBuild {
            message: message.into(),
        }
    }

    /// Returns a short, stable label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ClientBuild { .. } => "client_build",
            Self::Request(_) => "request",
            Self::Status { .. } => "status",
            Self::Decode(_) => "decode",
            Self::MissingText => "missing_text",
            Self::Timeout(_) => "timeout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            FactError::Status { status: 503 }.to_string(),
            "fact service returned status 503"
        );
        assert_eq!(
            FactError::Timeout(Duration::from_millis(250)).to_string(),
            "fact lookup timed out after 250ms"
        );
        assert!(FactError::client_build("no tls")
            .to_string()
            .contains("no tls"));
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(FactError::MissingText.kind(), "missing_text");
        assert_eq!(FactError::Status { status: 404 }.kind(), "status");
    }
}
