//! Everything about a chia installation that depends on the selected network.

use serde_yaml::Value;

use chia_tools_config::{ConfigError, FieldPath};
use chia_tools_types::{NetworkName, Peer};

/// Peer port on mainnet.
pub const MAINNET_PORT: u16 = 8444;

/// Peer port on every other network.
pub const TESTNET_PORT: u16 = 58444;

/// Network-dependent values, derived only from the network name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkProfile {
    pub network: NetworkName,
    pub introducer_host: String,
    pub dns_introducer_host: String,
    pub full_node_port: u16,
    pub peers_file_path: String,
    pub wallet_peers_file_path: String,
    pub bootstrap_peers: Vec<String>,
    pub database_path: String,
}

impl NetworkProfile {
    pub fn resolve(network: &NetworkName) -> Self {
        let name = network.as_str();
        let database_path = format!("db/blockchain_v2_{name}.sqlite");

        if network.is_mainnet() {
            Self {
                network: network.clone(),
                introducer_host: "introducer.chia.net".into(),
                dns_introducer_host: "dns-introducer.chia.net".into(),
                full_node_port: MAINNET_PORT,
                peers_file_path: "peers.dat".into(),
                wallet_peers_file_path: "wallet/db/wallet_peers.dat".into(),
                bootstrap_peers: vec!["node.chia.net".into()],
                database_path,
            }
        } else {
            Self {
                network: network.clone(),
                introducer_host: format!("introducer-{name}.chia.net"),
                dns_introducer_host: format!("dns-introducer-{name}.chia.net"),
                full_node_port: TESTNET_PORT,
                peers_file_path: format!("peers-{name}.dat"),
                wallet_peers_file_path: format!("wallet/db/wallet_peers-{name}.dat"),
                bootstrap_peers: vec![format!("node-{name}.chia.net")],
                database_path,
            }
        }
    }

    /// Every config field a switch to this network writes, with its value.
    pub fn field_updates(&self) -> Result<Vec<(FieldPath, Value)>, ConfigError> {
        let port = Value::from(self.full_node_port);
        let local_peers = serde_yaml::to_value(vec![Peer::localhost(self.full_node_port)])
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        let dns_servers = Value::Sequence(vec![Value::from(self.dns_introducer_host.as_str())]);
        let bootstrap_peers = Value::Sequence(
            self.bootstrap_peers
                .iter()
                .map(|peer| Value::from(peer.as_str()))
                .collect(),
        );

        let updates = [
            ("selected_network", Value::from(self.network.as_str())),
            ("full_node.port", port.clone()),
            ("full_node.database_path", Value::from(self.database_path.as_str())),
            ("full_node.dns_servers", dns_servers.clone()),
            ("full_node.peers_file_path", Value::from(self.peers_file_path.as_str())),
            ("full_node.introducer_peer.host", Value::from(self.introducer_host.as_str())),
            ("full_node.introducer_peer.port", port.clone()),
            ("farmer.full_node_peers", local_peers.clone()),
            ("introducer.port", port.clone()),
            ("seeder.port", port.clone()),
            ("seeder.other_peers_port", port.clone()),
            ("seeder.bootstrap_peers", bootstrap_peers),
            ("timelord.full_node_peers", local_peers.clone()),
            ("wallet.dns_servers", dns_servers),
            ("wallet.full_node_peers", local_peers),
            ("wallet.introducer_peer.host", Value::from(self.introducer_host.as_str())),
            ("wallet.introducer_peer.port", port),
            ("wallet.wallet_peers_file_path", Value::from(self.wallet_peers_file_path.as_str())),
        ];

        updates
            .into_iter()
            .map(|(path, value)| Ok::<_, ConfigError>((FieldPath::parse(path)?, value)))
            .collect()
    }
}
