//! HTTPS JSON client for a single chia service's RPC server.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::path::Path;
use std::time::Duration;

use chia_tools_config::{ConfigDocument, ConfigError};
use chia_tools_types::{Mojos, ServiceName};

use crate::tls::TlsIdentity;
use crate::types::{
    Envelope, KeysValues, Mirrors, NetworkInfo, SpendableCoins, SplitCoinsRequest,
    SplitCoinsResponse, Subscriptions,
};
use crate::RpcError;

/// Default timeout for service RPC requests.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Config section holding a service's `rpc_port` and `ssl` pair.
pub fn rpc_section(service: ServiceName) -> &'static str {
    match service {
        ServiceName::Crawler => "seeder.crawler",
        other => other.config_section(),
    }
}

/// Client for one service's RPC server.
///
/// Every endpoint is `POST https://<host>:<rpc_port>/<endpoint>` with a JSON
/// body; the response's `success` flag is checked before decoding.
pub struct RpcClient {
    service: ServiceName,
    base_url: String,
    http_client: reqwest::Client,
}

impl RpcClient {
    /// Create a client against `base_url` presenting `identity`.
    pub fn new(
        service: ServiceName,
        base_url: impl Into<String>,
        identity: &TlsIdentity,
        timeout: Duration,
    ) -> Result<Self, RpcError> {
        let http_client = reqwest::Client::builder()
            .use_preconfigured_tls(identity.client_config()?)
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            service,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Create a client for `service` on localhost using the port and private
    /// certificate pair from the config.
    pub fn from_config(
        doc: &ConfigDocument,
        chia_root: &Path,
        service: ServiceName,
        timeout: Duration,
    ) -> Result<Self, RpcError> {
        let section = rpc_section(service);
        let port_field = format!("{section}.rpc_port");
        let port = doc
            .port_at(&port_field)
            .ok_or(ConfigError::MissingField(port_field))?;
        let ssl = format!("{section}.ssl");
        let identity = TlsIdentity::from_config(doc, chia_root, &ssl, "private_crt", "private_key")?;
        Self::new(service, format!("https://localhost:{port}"), &identity, timeout)
    }

    pub fn service(&self) -> ServiceName {
        self.service
    }

    /// POST `body` to `endpoint` and decode the response.
    pub async fn call<B, T>(&self, endpoint: &str, body: &B) -> Result<T, RpcError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{endpoint}", self.base_url);
        tracing::debug!(service = %self.service, %url, "rpc request");

        let response = self.http_client.post(&url).json(body).send().await?;
        if !response.status().is_success() {
            return Err(RpcError::Status(response.status().as_u16()));
        }
        let value: serde_json::Value = response.json().await?;
        decode_response(endpoint, value)
    }

    // ── Shared ─────────────────────────────────────────────────────────

    pub async fn get_network_info(&self) -> Result<NetworkInfo, RpcError> {
        self.call("get_network_info", &json!({})).await
    }

    // ── Wallet ─────────────────────────────────────────────────────────

    pub async fn get_spendable_coins(&self, wallet_id: u32) -> Result<SpendableCoins, RpcError> {
        self.call("get_spendable_coins", &json!({ "wallet_id": wallet_id }))
            .await
    }

    pub async fn split_coins(
        &self,
        request: &SplitCoinsRequest,
    ) -> Result<SplitCoinsResponse, RpcError> {
        self.call("split_coins", request).await
    }

    // ── Data layer ─────────────────────────────────────────────────────

    pub async fn get_subscriptions(&self) -> Result<Subscriptions, RpcError> {
        self.call("subscriptions", &json!({})).await
    }

    pub async fn get_mirrors(&self, store_id: &str) -> Result<Mirrors, RpcError> {
        self.call("get_mirrors", &json!({ "id": store_id })).await
    }

    pub async fn delete_mirror(&self, coin_id: &str, fee: Mojos) -> Result<(), RpcError> {
        let _: Envelope = self
            .call("delete_mirror", &json!({ "coin_id": coin_id, "fee": fee.get() }))
            .await?;
        Ok(())
    }

    pub async fn get_keys_values(&self, store_id: &str) -> Result<KeysValues, RpcError> {
        self.call("get_keys_values", &json!({ "id": store_id })).await
    }
}

/// Check the `success` flag, then decode the payload.
pub(crate) fn decode_response<T: DeserializeOwned>(
    command: &str,
    value: serde_json::Value,
) -> Result<T, RpcError> {
    let envelope: Envelope = serde_json::from_value(value.clone())
        .map_err(|e| RpcError::InvalidResponse(e.to_string()))?;
    if !envelope.success {
        return Err(RpcError::Unsuccessful {
            command: command.to_string(),
            reason: envelope.error.unwrap_or_else(|| "unknown error".to_string()),
        });
    }
    serde_json::from_value(value).map_err(|e| RpcError::InvalidResponse(e.to_string()))
}
