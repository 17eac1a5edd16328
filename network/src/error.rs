use std::path::PathBuf;
use thiserror::Error;

use chia_tools_config::ConfigError;
use chia_tools_rpc::RpcError;

/// Why a network switch stopped. Each variant maps to one step; nothing is
/// retried and nothing already done is rolled back.
#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("could not read the current network from the config: {0}")]
    Config(#[source] ConfigError),

    #[error("error creating directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error checking full node status: {0}")]
    ServiceQuery(#[source] RpcError),

    #[error("error stopping full node, stop chia services manually and try again: {0}")]
    ServiceStop(#[source] RpcError),

    #[error("error moving cache file {}: {source}", path.display())]
    CacheRelocation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error setting config field: {0}")]
    ConfigField(#[source] ConfigError),

    #[error("error saving config: {0}")]
    ConfigSave(#[source] ConfigError),
}
