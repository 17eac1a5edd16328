//! Network identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ToolsError;

/// Name of the canonical production network.
pub const MAINNET: &str = "mainnet";

/// Identifies a logical Chia network (`mainnet`, `testneta`, `testnet11`, ...).
///
/// There is no registry of known networks: any non-empty name is accepted,
/// provided it can be used as a single directory component (cache files are
/// archived under `db/<name>/`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NetworkName(String);

impl NetworkName {
    pub fn new(name: impl Into<String>) -> Result<Self, ToolsError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ToolsError::EmptyNetworkName);
        }
        if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
            return Err(ToolsError::InvalidNetworkName(name));
        }
        Ok(Self(name))
    }

    /// The production network.
    pub fn mainnet() -> Self {
        Self(MAINNET.to_string())
    }

    pub fn is_mainnet(&self) -> bool {
        self.0 == MAINNET
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NetworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NetworkName {
    type Err = ToolsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for NetworkName {
    type Error = ToolsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NetworkName> for String {
    fn from(name: NetworkName) -> Self {
        name.0
    }
}

impl AsRef<str> for NetworkName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
