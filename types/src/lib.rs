//! Shared types for chia-tools.
//!
//! This crate defines the small value types every other crate in the
//! workspace passes around: network names, peer endpoints, daemon service
//! names and XCH/mojo amounts.

pub mod amount;
pub mod error;
pub mod network;
pub mod peer;
pub mod service;

pub use amount::Mojos;
pub use error::ToolsError;
pub use network::NetworkName;
pub use peer::Peer;
pub use service::ServiceName;
