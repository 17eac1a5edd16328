//! Peer endpoint as stored in the chia config (`full_node_peers` entries).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host used for peers that point at the local full node.
pub const LOCALHOST: &str = "localhost";

/// A `{host, port}` pair, the shape of every `*_peers` list entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Peer {
    pub host: String,
    pub port: u16,
}

impl Peer {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// The local full node on the given port.
    pub fn localhost(port: u16) -> Self {
        Self::new(LOCALHOST, port)
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
