//! Services managed by the chia daemon.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ToolsError;

/// A service the daemon can start, stop and report on.
///
/// The string form is the name the daemon uses on its admin channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceName {
    #[serde(rename = "daemon")]
    Daemon,
    #[serde(rename = "chia_full_node")]
    FullNode,
    #[serde(rename = "chia_wallet")]
    Wallet,
    #[serde(rename = "chia_farmer")]
    Farmer,
    #[serde(rename = "chia_harvester")]
    Harvester,
    #[serde(rename = "chia_crawler")]
    Crawler,
    #[serde(rename = "chia_data_layer")]
    DataLayer,
    #[serde(rename = "chia_timelord")]
    Timelord,
}

impl ServiceName {
    /// Every service, in the order reports list them.
    pub const ALL: [ServiceName; 8] = [
        Self::Daemon,
        Self::FullNode,
        Self::Wallet,
        Self::Farmer,
        Self::Harvester,
        Self::Crawler,
        Self::DataLayer,
        Self::Timelord,
    ];

    /// Name on the daemon admin channel.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daemon => "daemon",
            Self::FullNode => "chia_full_node",
            Self::Wallet => "chia_wallet",
            Self::Farmer => "chia_farmer",
            Self::Harvester => "chia_harvester",
            Self::Crawler => "chia_crawler",
            Self::DataLayer => "chia_data_layer",
            Self::Timelord => "chia_timelord",
        }
    }

    /// Human-readable label for tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Daemon => "Daemon",
            Self::FullNode => "Full Node",
            Self::Wallet => "Wallet",
            Self::Farmer => "Farmer",
            Self::Harvester => "Harvester",
            Self::Crawler => "Crawler",
            Self::DataLayer => "Data Layer",
            Self::Timelord => "Timelord",
        }
    }

    /// Top-level config section holding this service's settings
    /// (`rpc_port`, `ssl`, ...).
    pub fn config_section(&self) -> &'static str {
        match self {
            Self::Daemon => "daemon_ssl",
            Self::FullNode => "full_node",
            Self::Wallet => "wallet",
            Self::Farmer => "farmer",
            Self::Harvester => "harvester",
            Self::Crawler => "seeder",
            Self::DataLayer => "data_layer",
            Self::Timelord => "timelord",
        }
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceName {
    type Err = ToolsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service| service.as_str() == s)
            .ok_or_else(|| ToolsError::UnknownService(s.to_string()))
    }
}
