//! Clients for a running chia installation.
//!
//! - [`DaemonClient`]: the daemon's WebSocket admin channel (service
//!   lifecycle, network info), behind the [`ServiceController`] trait.
//! - [`RpcClient`]: one service's HTTPS JSON RPC server.
//! - [`TlsPeerIdResolver`]: a remote node's peer ID, behind [`PeerIdResolver`].
//!
//! All connections use mutual TLS with certificate pairs from the chia root.

pub mod client;
pub mod controller;
pub mod daemon;
pub mod error;
pub mod peer_id;
pub mod tls;
pub mod types;

pub use client::{rpc_section, RpcClient, DEFAULT_RPC_TIMEOUT};
pub use controller::ServiceController;
pub use daemon::{DaemonClient, DaemonMessage, DEFAULT_DAEMON_TIMEOUT};
pub use error::RpcError;
pub use peer_id::{peer_id_from_der, PeerIdResolver, RetryPolicy, TlsPeerIdResolver};
pub use tls::TlsIdentity;
