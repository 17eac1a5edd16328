//! Error type for value parsing shared across crates.

use thiserror::Error;

/// Errors raised while constructing the shared value types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ToolsError {
    #[error("network name must not be empty")]
    EmptyNetworkName,

    #[error("invalid network name {0:?}: must not contain path separators")]
    InvalidNetworkName(String),

    #[error("invalid XCH amount format: {0}")]
    InvalidAmount(String),

    #[error("XCH amount {0} does not fit in 64 bits of mojos")]
    AmountOverflow(String),

    #[error("unknown service: {0}")]
    UnknownService(String),
}
