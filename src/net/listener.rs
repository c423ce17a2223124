//! TCP listener binding.
//!
//! # Responsibilities
//! - Parse the configured bind address
//! - Bind the single listening socket
//!
//! # Design Decisions
//! - Any failure here is fatal; the caller must not proceed to serve

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The configured address is not a valid socket address.
    #[error("Invalid bind address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// The OS refused the bind (port in use, permission denied, ...).
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Bind a TCP listener on `address` (e.g. `"0.0.0.0:8080"`).
pub async fn bind(address: &str) -> Result<TcpListener, ListenerError> {
    let addr: SocketAddr = address
        .parse()
        .map_err(|source| ListenerError::InvalidAddress {
            address: address.to_string(),
            source,
        })?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ListenerError::Bind {
            address: addr,
            source,
        })?;

    tracing::debug!(address = %addr, "Listener bound");
    Ok(listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn binds_ephemeral_port() {
        let listener = bind("127.0.0.1:0").await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn rejects_malformed_address() {
        let err = bind("not-an-address").await.unwrap_err();
        assert!(matches!(err, ListenerError::InvalidAddress { .. }));
    }

    #[tokio::test]
    async fn port_in_use_is_a_bind_error() {
        let first = bind("127.0.0.1:0").await.unwrap();
        let taken = first.local_addr().unwrap().to_string();

        let err = bind(&taken).await.unwrap_err();
        assert!(matches!(err, ListenerError::Bind { .. }));
    }
}
