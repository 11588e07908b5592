//! Server error types.

use std::net::SocketAddr;

use numeris_facts::FactError;
use thiserror::Error;

/// Errors raised while building or running the server.
///
/// Request-level failures never surface here; they are rendered as HTTP
/// responses by the request pipeline.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The configured bind address does not parse.
    #[error("invalid address '{addr}': {reason}")]
    InvalidAddress {
        /// The configured address.
        addr: String,
        /// Parser message.
        reason: String,
    },

    /// Failed to bind the listener.
    #[error("failed to bind to {addr}: {source}")]
    Bind {
        /// The address that could not be bound.
        addr: SocketAddr,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// I/O error during server operation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The outbound fact client could not be built.
    #[error("fact client error: {0}")]
    FactClient(#[from] FactError),

    /// The cross-origin policy could not be built.
    #[error("invalid CORS policy: {0}")]
    Cors(String),
}
