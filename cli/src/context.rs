//! Values every command receives explicitly.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chia_tools_config::{default_config_path, ConfigStore, Settings, YamlConfigStore};
use chia_tools_rpc::{DaemonClient, RetryPolicy, RpcClient};
use chia_tools_types::ServiceName;
use chia_tools_utils::ConfirmPolicy;

/// Resolved root, config location, tool settings and prompt policy.
pub struct CommandContext {
    pub chia_root: PathBuf,
    pub config_path: PathBuf,
    pub settings: Settings,
    pub confirm: ConfirmPolicy,
}

impl CommandContext {
    pub fn new(chia_root: PathBuf, config_path: Option<PathBuf>, settings: Settings) -> Self {
        let config_path = config_path.unwrap_or_else(|| default_config_path(&chia_root));
        Self {
            chia_root,
            config_path,
            settings,
            confirm: ConfirmPolicy::default(),
        }
    }

    /// Prompt policy for a command that takes `--yes`.
    pub fn confirm_policy(&self, assume_yes: bool) -> ConfirmPolicy {
        ConfirmPolicy::new(self.confirm.assume_yes || assume_yes)
    }

    pub fn chia_root(&self) -> &Path {
        &self.chia_root
    }

    pub fn load_config(&self) -> anyhow::Result<YamlConfigStore> {
        YamlConfigStore::load(&self.config_path, &self.chia_root)
            .with_context(|| format!("loading {}", self.config_path.display()))
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.rpc_timeout_secs)
    }

    pub fn daemon_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.daemon_timeout_secs)
    }

    pub fn retry_policy(&self, retries: Option<u32>) -> RetryPolicy {
        RetryPolicy::with_retries(retries.unwrap_or(self.settings.peer_retries))
    }

    pub fn daemon(&self, store: &YamlConfigStore) -> anyhow::Result<DaemonClient> {
        DaemonClient::from_config(store.document(), &self.chia_root, self.daemon_timeout())
            .context("creating daemon client")
    }

    pub fn rpc_client(
        &self,
        store: &YamlConfigStore,
        service: ServiceName,
    ) -> anyhow::Result<RpcClient> {
        RpcClient::from_config(store.document(), &self.chia_root, service, self.rpc_timeout())
            .with_context(|| format!("creating {} RPC client", service.label()))
    }
}
