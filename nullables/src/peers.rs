//! Nullable peer identity lookup and network info.

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::IpAddr;

use chia_tools_network::NetworkInfoSource;
use chia_tools_rpc::{PeerIdResolver, RpcError};
use chia_tools_types::ServiceName;

/// Answers peer-ID lookups from a fixed table. Unknown peers are refused.
#[derive(Default)]
pub struct NullPeerIdResolver {
    peers: HashMap<(IpAddr, u16), String>,
    calls: RefCell<Vec<(IpAddr, u16)>>,
}

impl NullPeerIdResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_peer(mut self, ip: IpAddr, port: u16, peer_id: &str) -> Self {
        self.peers.insert((ip, port), peer_id.to_string());
        self
    }

    /// Every lookup made, in order.
    pub fn calls(&self) -> Vec<(IpAddr, u16)> {
        self.calls.borrow().clone()
    }
}

impl PeerIdResolver for NullPeerIdResolver {
    async fn peer_id(&self, ip: IpAddr, port: u16) -> Result<String, RpcError> {
        self.calls.borrow_mut().push((ip, port));
        self.peers
            .get(&(ip, port))
            .cloned()
            .ok_or_else(|| RpcError::ConnectionRefused(format!("{ip}:{port}")))
    }
}

/// Network info from a fixed table; absent services are not running.
#[derive(Default)]
pub struct NullNetworkInfo {
    networks: HashMap<ServiceName, String>,
}

impl NullNetworkInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service(mut self, service: ServiceName, network: &str) -> Self {
        self.networks.insert(service, network.to_string());
        self
    }
}

impl NetworkInfoSource for NullNetworkInfo {
    async fn network_name(&self, service: ServiceName) -> Option<String> {
        self.networks.get(&service).cloned()
    }
}
