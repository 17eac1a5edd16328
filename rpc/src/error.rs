//! RPC error types.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    /// Nothing is listening at the address. For the daemon this means the
    /// chia services are not running at all.
    #[error("connection refused by {0}")]
    ConnectionRefused(String),

    #[error("connection to {url} failed: {reason}")]
    Connection { url: String, reason: String },

    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("could not read {}: {source}", path.display())]
    Certificate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no private key found in {}", .0.display())]
    MissingKey(PathBuf),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The remote answered but reported `success: false`.
    #[error("{command} failed: {reason}")]
    Unsuccessful { command: String, reason: String },

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] chia_tools_config::ConfigError),
}

impl RpcError {
    /// Whether the remote end was simply not listening.
    pub fn is_connection_refused(&self) -> bool {
        matches!(self, Self::ConnectionRefused(_))
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(e: reqwest::Error) -> Self {
        let url = e.url().map(|u| u.to_string()).unwrap_or_default();
        if e.is_connect() && refused_in_chain(&e) {
            RpcError::ConnectionRefused(url)
        } else if e.is_timeout() {
            RpcError::Connection {
                url,
                reason: format!("request timed out: {e}"),
            }
        } else if e.is_decode() {
            RpcError::InvalidResponse(e.to_string())
        } else {
            RpcError::Connection {
                url,
                reason: e.to_string(),
            }
        }
    }
}

/// Walk the source chain looking for an `io::ErrorKind::ConnectionRefused`.
pub(crate) fn refused_in_chain(error: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        current = e.source();
    }
    false
}
