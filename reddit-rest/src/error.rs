//! Errors starting or running the REST server.

use std::net::SocketAddr;

/// The REST server could not start or stopped unexpectedly.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// The listen address could not be bound.
    #[error("could not bind {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: SocketAddr,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The server loop failed.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
