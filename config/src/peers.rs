//! Wallet trusted-peer management.
//!
//! A trusted peer is recorded twice: its node ID goes into
//! `wallet.trusted_peers` (the value is ignored by the wallet) and its
//! address into `wallet.full_node_peers` so the wallet connects to it.

use serde_yaml::Value;

use chia_tools_types::Peer;

use crate::{ConfigDocument, ConfigError, FieldPath};

/// Placeholder entry the default config ships in `wallet.trusted_peers`.
pub const PLACEHOLDER_PEER_ID: &str =
    "0ThisisanexampleNodeID7ff9d60f1c3fa270c213c0ad0cb89c01274634a7c3cb9";

/// Value stored against each trusted peer ID.
pub const TRUSTED_PEER_VALUE: &str = "Does_not_matter";

const TRUSTED_PEERS: &str = "wallet.trusted_peers";
const WALLET_FULL_NODE_PEERS: &str = "wallet.full_node_peers";

impl ConfigDocument {
    /// IDs currently in `wallet.trusted_peers`.
    pub fn trusted_peer_ids(&self) -> Vec<String> {
        match self.get_str_path(TRUSTED_PEERS) {
            Some(Value::Mapping(map)) => map
                .keys()
                .filter_map(|key| key.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Entries of `wallet.full_node_peers`.
    pub fn wallet_full_node_peers(&self) -> Result<Vec<Peer>, ConfigError> {
        match self.get_str_path(WALLET_FULL_NODE_PEERS) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => {
                serde_yaml::from_value(value.clone()).map_err(|e| ConfigError::InvalidValue {
                    path: WALLET_FULL_NODE_PEERS.into(),
                    reason: e.to_string(),
                })
            }
        }
    }

    fn set_wallet_full_node_peers(&mut self, peers: &[Peer]) -> Result<(), ConfigError> {
        let value = serde_yaml::to_value(peers).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        self.set(&FieldPath::parse(WALLET_FULL_NODE_PEERS)?, value)
    }

    /// Trust `peer_id` and make sure the wallet connects to `peer`.
    ///
    /// An existing `full_node_peers` entry with the same host is replaced
    /// (so a port change takes effect); otherwise the peer is appended.
    pub fn add_trusted_peer(&mut self, peer_id: &str, peer: Peer) -> Result<(), ConfigError> {
        self.mapping_mut(TRUSTED_PEERS)?.insert(
            Value::String(peer_id.to_string()),
            Value::String(TRUSTED_PEER_VALUE.to_string()),
        );

        let mut peers = self.wallet_full_node_peers()?;
        let mut found = false;
        for existing in peers.iter_mut().filter(|p| p.host == peer.host) {
            *existing = peer.clone();
            found = true;
        }
        if !found {
            peers.push(peer);
        }
        self.set_wallet_full_node_peers(&peers)
    }

    /// Stop trusting `peer_id` and drop `full_node_peers` entries for exactly
    /// `peer`'s host and port. Returns whether the ID was trusted.
    pub fn remove_trusted_peer(&mut self, peer_id: &str, peer: &Peer) -> Result<bool, ConfigError> {
        let removed = self
            .mapping_mut(TRUSTED_PEERS)?
            .remove(peer_id)
            .is_some();

        let peers: Vec<Peer> = self
            .wallet_full_node_peers()?
            .into_iter()
            .filter(|p| p != peer)
            .collect();
        self.set_wallet_full_node_peers(&peers)?;
        Ok(removed)
    }

    /// Reset to the shipped defaults: only the placeholder trusted peer, and
    /// the wallet connecting to the local full node.
    pub fn reset_trusted_peers(&mut self) -> Result<(), ConfigError> {
        let port = self.full_node_port()?;
        let trusted = self.mapping_mut(TRUSTED_PEERS)?;
        trusted.clear();
        trusted.insert(
            Value::String(PLACEHOLDER_PEER_ID.to_string()),
            Value::String(TRUSTED_PEER_VALUE.to_string()),
        );
        self.set_wallet_full_node_peers(&[Peer::localhost(port)])
    }
}
