//! Client for the chia daemon's WebSocket admin channel.
//!
//! The daemon multiplexes requests over one WebSocket. Each request carries a
//! random `request_id` and the daemon echoes it back in the response, so a
//! client reads frames until it sees its own ID.

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::Connector;

use chia_tools_config::ConfigDocument;
use chia_tools_types::ServiceName;

use crate::client::decode_response;
use crate::error::refused_in_chain;
use crate::tls::TlsIdentity;
use crate::types::{Envelope, NetworkInfo};
use crate::{RpcError, ServiceController};

/// Port the daemon listens on when the config does not say.
pub const DEFAULT_DAEMON_PORT: u16 = 55400;

/// Host used when `self_hostname` is absent.
pub const DEFAULT_SELF_HOSTNAME: &str = "localhost";

/// Name this client registers under in `origin`.
const ORIGIN: &str = "chia_tools";

/// Default time to wait for a status query. Service stop and start are not
/// bounded.
pub const DEFAULT_DAEMON_TIMEOUT: Duration = Duration::from_secs(30);

/// One message on the admin channel, in either direction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DaemonMessage {
    pub command: String,
    pub ack: bool,
    pub data: serde_json::Value,
    pub origin: String,
    pub destination: String,
    pub request_id: String,
}

impl DaemonMessage {
    /// A request addressed to the daemon itself.
    pub fn request(command: &str, data: serde_json::Value) -> Result<Self, RpcError> {
        Ok(Self {
            command: command.to_string(),
            ack: false,
            data,
            origin: ORIGIN.to_string(),
            destination: "daemon".to_string(),
            request_id: new_request_id()?,
        })
    }
}

fn new_request_id() -> Result<String, RpcError> {
    let mut bytes = [0u8; 32];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| RpcError::Io(std::io::Error::other(e.to_string())))?;
    Ok(hex::encode(bytes))
}

#[derive(Debug, Deserialize)]
struct IsRunning {
    is_running: bool,
}

/// Client for the daemon's admin channel.
///
/// Opens a fresh connection per request; the operations here are rare and
/// strictly sequential.
pub struct DaemonClient {
    url: String,
    tls: Arc<rustls::ClientConfig>,
    timeout: Duration,
}

impl DaemonClient {
    pub fn new(url: impl Into<String>, identity: &TlsIdentity, timeout: Duration) -> Result<Self, RpcError> {
        Ok(Self {
            url: url.into(),
            tls: Arc::new(identity.client_config()?),
            timeout,
        })
    }

    /// Connect to `wss://<self_hostname>:<daemon_port>` with the
    /// `daemon_ssl` private pair from the config.
    pub fn from_config(
        doc: &ConfigDocument,
        chia_root: &Path,
        timeout: Duration,
    ) -> Result<Self, RpcError> {
        let host = doc
            .string_at("self_hostname")
            .unwrap_or(DEFAULT_SELF_HOSTNAME);
        let port = doc.port_at("daemon_port").unwrap_or(DEFAULT_DAEMON_PORT);
        let identity =
            TlsIdentity::from_config(doc, chia_root, "daemon_ssl", "private_crt", "private_key")?;
        Self::new(format!("wss://{host}:{port}"), &identity, timeout)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one request and wait up to the client timeout for the matching
    /// response's `data`.
    pub async fn request(
        &self,
        command: &str,
        data: serde_json::Value,
    ) -> Result<serde_json::Value, RpcError> {
        tokio::time::timeout(self.timeout, self.request_unbounded(command, data))
            .await
            .map_err(|_| RpcError::Timeout(self.timeout))?
    }

    /// Like [`request`](Self::request) with no deadline. Stopping a full
    /// node can take minutes while it flushes its database, and giving up
    /// early would leave it stopping with nothing switched.
    pub async fn request_unbounded(
        &self,
        command: &str,
        data: serde_json::Value,
    ) -> Result<serde_json::Value, RpcError> {
        let message = DaemonMessage::request(command, data)?;
        tracing::debug!(url = %self.url, command, request_id = %message.request_id, "daemon request");
        self.exchange(&message).await
    }

    async fn exchange(&self, message: &DaemonMessage) -> Result<serde_json::Value, RpcError> {
        let (mut socket, _) = tokio_tungstenite::connect_async_tls_with_config(
            self.url.as_str(),
            None,
            false,
            Some(Connector::Rustls(self.tls.clone())),
        )
        .await
        .map_err(|e| self.connect_error(e))?;

        let text = serde_json::to_string(message)
            .map_err(|e| RpcError::InvalidResponse(e.to_string()))?;
        socket
            .send(Message::Text(text))
            .await
            .map_err(|e| self.connect_error(e))?;

        while let Some(frame) = socket.next().await {
            let frame = frame.map_err(|e| self.connect_error(e))?;
            let text = match frame {
                Message::Text(text) => text,
                Message::Binary(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Message::Close(_) => break,
                _ => continue,
            };
            let response: DaemonMessage = serde_json::from_str(&text)
                .map_err(|e| RpcError::InvalidResponse(e.to_string()))?;
            if response.request_id == message.request_id {
                let _ = socket.close(None).await;
                return Ok(response.data);
            }
        }

        Err(RpcError::Connection {
            url: self.url.clone(),
            reason: format!("connection closed before a response to {}", message.command),
        })
    }

    fn connect_error(&self, e: tungstenite::Error) -> RpcError {
        match &e {
            tungstenite::Error::Io(io) if io.kind() == std::io::ErrorKind::ConnectionRefused => {
                RpcError::ConnectionRefused(self.url.clone())
            }
            other if refused_in_chain(other) => RpcError::ConnectionRefused(self.url.clone()),
            _ => RpcError::Connection {
                url: self.url.clone(),
                reason: e.to_string(),
            },
        }
    }

    /// The network the daemon is running on.
    pub async fn get_network_info(&self) -> Result<NetworkInfo, RpcError> {
        let data = self.request("get_network_info", json!({})).await?;
        decode_response("get_network_info", data)
    }
}

impl ServiceController for DaemonClient {
    async fn is_running(&self, service: ServiceName) -> Result<bool, RpcError> {
        let data = self
            .request("is_running", json!({ "service": service.as_str() }))
            .await?;
        let status: IsRunning = decode_response("is_running", data)?;
        Ok(status.is_running)
    }

    async fn stop_service(&self, service: ServiceName) -> Result<(), RpcError> {
        let data = self
            .request_unbounded("stop_service", json!({ "service": service.as_str() }))
            .await?;
        let _: Envelope = decode_response("stop_service", data)?;
        Ok(())
    }

    async fn start_service(&self, service: ServiceName) -> Result<(), RpcError> {
        let data = self
            .request_unbounded("start_service", json!({ "service": service.as_str() }))
            .await?;
        let _: Envelope = decode_response("start_service", data)?;
        Ok(())
    }
}
