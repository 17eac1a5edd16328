//! Which network the config and each running service are on.

use std::path::Path;
use std::time::Duration;

use chia_tools_config::ConfigDocument;
use chia_tools_rpc::{DaemonClient, RpcClient, RpcError};
use chia_tools_types::ServiceName;
use chia_tools_utils::render_rows;

/// Shown for services that did not answer.
pub const NOT_RUNNING: &str = "Not Running";

/// Reports the network a service is running on.
#[allow(async_fn_in_trait)]
pub trait NetworkInfoSource {
    /// The network `service` reports, or `None` if it could not be reached.
    async fn network_name(&self, service: ServiceName) -> Option<String>;
}

/// Asks the daemon over its admin channel and every other service over RPC.
pub struct RpcNetworkInfo<'a> {
    doc: &'a ConfigDocument,
    chia_root: &'a Path,
    daemon_timeout: Duration,
    rpc_timeout: Duration,
}

impl<'a> RpcNetworkInfo<'a> {
    pub fn new(
        doc: &'a ConfigDocument,
        chia_root: &'a Path,
        daemon_timeout: Duration,
        rpc_timeout: Duration,
    ) -> Self {
        Self {
            doc,
            chia_root,
            daemon_timeout,
            rpc_timeout,
        }
    }

    async fn query(&self, service: ServiceName) -> Result<String, RpcError> {
        let info = match service {
            ServiceName::Daemon => {
                DaemonClient::from_config(self.doc, self.chia_root, self.daemon_timeout)?
                    .get_network_info()
                    .await?
            }
            other => {
                RpcClient::from_config(self.doc, self.chia_root, other, self.rpc_timeout)?
                    .get_network_info()
                    .await?
            }
        };
        Ok(info.network_name)
    }
}

impl NetworkInfoSource for RpcNetworkInfo<'_> {
    async fn network_name(&self, service: ServiceName) -> Option<String> {
        match self.query(service).await {
            Ok(name) => Some(name),
            Err(e) => {
                tracing::debug!(%service, error = %e, "error getting network info");
                None
            }
        }
    }
}

/// The selected network plus what each service reports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkReport {
    pub config: String,
    pub services: Vec<(ServiceName, Option<String>)>,
}

impl NetworkReport {
    /// Query every service in [`ServiceName::ALL`] order, one at a time.
    pub async fn collect<N: NetworkInfoSource>(config_network: &str, source: &N) -> Self {
        let mut services = Vec::with_capacity(ServiceName::ALL.len());
        for service in ServiceName::ALL {
            services.push((service, source.network_name(service).await));
        }
        Self {
            config: config_network.to_string(),
            services,
        }
    }

    pub fn render(&self) -> String {
        let mut rows = vec![("Config", self.config.as_str())];
        rows.extend(self.services.iter().map(|(service, network)| {
            (service.label(), network.as_deref().unwrap_or(NOT_RUNNING))
        }));
        render_rows(&rows)
    }
}
