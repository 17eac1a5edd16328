//! Fetching a remote full node's peer ID.
//!
//! A chia peer ID is the SHA-256 of the DER certificate the node presents on
//! its peer port. Only the TLS handshake is needed to learn it.

use sha2::{Digest, Sha256};
use std::future::Future;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

use rustls::pki_types::ServerName;

use chia_tools_config::ConfigDocument;

use crate::tls::TlsIdentity;
use crate::RpcError;

/// Name sent for SNI. Chia nodes do not check it.
const PEER_SERVER_NAME: &str = "chia.net";

/// Default time allowed for connect plus handshake.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(3);

// ── Retry policy ───────────────────────────────────────────────────────

/// How many times to try an operation, and how long to wait in between.
///
/// Backoff is linear: before attempt `n + 1` (zero-based `n >= 1`) the caller
/// waits `n` units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    unit: Duration,
}

impl RetryPolicy {
    /// One initial attempt plus `retries` retries, backing off in seconds.
    pub fn with_retries(retries: u32) -> Self {
        Self {
            max_attempts: retries.saturating_add(1),
            unit: Duration::from_secs(1),
        }
    }

    /// Replace the backoff unit (tests use zero).
    pub fn with_unit(mut self, unit: Duration) -> Self {
        self.unit = unit;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before the zero-based `attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.unit * attempt
    }

    /// Run `op` until it succeeds or attempts run out, returning the last
    /// error. `op` receives the zero-based attempt number.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0;
        loop {
            if attempt > 0 {
                let delay = self.backoff(attempt);
                tracing::debug!(
                    attempt = attempt + 1,
                    max_attempts = self.max_attempts,
                    sleep_ms = delay.as_millis() as u64,
                    "retrying"
                );
                tokio::time::sleep(delay).await;
            }
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt + 1 >= self.max_attempts => return Err(e),
                Err(e) => {
                    tracing::debug!(attempt = attempt + 1, error = %e, "attempt failed");
                }
            }
            attempt += 1;
        }
    }
}

impl Default for RetryPolicy {
    /// Three retries, four attempts in total.
    fn default() -> Self {
        Self::with_retries(3)
    }
}

// ── Resolver ───────────────────────────────────────────────────────────

/// Something that can learn the peer ID of a node at an address.
#[allow(async_fn_in_trait)]
pub trait PeerIdResolver {
    /// Lowercase hex peer ID of the node at `ip:port`.
    async fn peer_id(&self, ip: IpAddr, port: u16) -> Result<String, RpcError>;
}

/// Resolves peer IDs with a TLS handshake, retrying per [`RetryPolicy`].
pub struct TlsPeerIdResolver {
    connector: TlsConnector,
    retry: RetryPolicy,
    handshake_timeout: Duration,
}

impl TlsPeerIdResolver {
    pub fn new(identity: &TlsIdentity, retry: RetryPolicy) -> Result<Self, RpcError> {
        Ok(Self {
            connector: TlsConnector::from(Arc::new(identity.client_config()?)),
            retry,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        })
    }

    /// Authenticate with the local full node's public certificate pair.
    pub fn from_config(
        doc: &ConfigDocument,
        chia_root: &Path,
        retry: RetryPolicy,
    ) -> Result<Self, RpcError> {
        let identity =
            TlsIdentity::from_config(doc, chia_root, "full_node.ssl", "public_crt", "public_key")?;
        Self::new(&identity, retry)
    }

    async fn handshake(&self, addr: SocketAddr) -> Result<String, RpcError> {
        let server_name = ServerName::try_from(PEER_SERVER_NAME.to_string())
            .map_err(|e| RpcError::Tls(e.to_string()))?;

        let connect = async {
            let stream = TcpStream::connect(addr).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::ConnectionRefused {
                    RpcError::ConnectionRefused(addr.to_string())
                } else {
                    RpcError::Io(e)
                }
            })?;
            self.connector
                .connect(server_name, stream)
                .await
                .map_err(|e| RpcError::Tls(e.to_string()))
        };
        let tls = tokio::time::timeout(self.handshake_timeout, connect)
            .await
            .map_err(|_| RpcError::Timeout(self.handshake_timeout))??;

        let (_, session) = tls.get_ref();
        let leaf = session
            .peer_certificates()
            .and_then(|certs| certs.first())
            .ok_or_else(|| RpcError::Tls(format!("{addr} presented no certificate")))?;
        Ok(peer_id_from_der(leaf.as_ref()))
    }
}

impl PeerIdResolver for TlsPeerIdResolver {
    async fn peer_id(&self, ip: IpAddr, port: u16) -> Result<String, RpcError> {
        let addr = SocketAddr::new(ip, port);
        tracing::info!(peer = %ip, port, "attempting to get peer id");
        self.retry.run(|_| self.handshake(addr)).await
    }
}

/// Peer ID for a DER-encoded certificate.
pub fn peer_id_from_der(der: &[u8]) -> String {
    hex::encode(Sha256::digest(der))
}
