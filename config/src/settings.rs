//! Settings for the tool itself, loaded from an optional TOML file.
//!
//! These are distinct from the chia `config.yaml` being administered.
//! Command-line flags override whatever is read here.

use serde::{Deserialize, Serialize};
use std::path::Path;

use chia_tools_utils::LogFormat;

use crate::ConfigError;

/// Tool settings.
///
/// Can be loaded from a TOML file via [`Settings::from_toml_file`] or built
/// programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Retries after the first attempt when fetching a peer's node ID.
    #[serde(default = "default_peer_retries")]
    pub peer_retries: u32,

    /// Seconds to wait for a service RPC response.
    #[serde(default = "default_rpc_timeout_secs")]
    pub rpc_timeout_secs: u64,

    /// Seconds to wait for the daemon to answer a status query. Service stop
    /// and start wait as long as the daemon takes.
    #[serde(default = "default_daemon_timeout_secs")]
    pub daemon_timeout_secs: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}

fn default_peer_retries() -> u32 {
    3
}

fn default_rpc_timeout_secs() -> u64 {
    30
}

fn default_daemon_timeout_secs() -> u64 {
    30
}

// ── Impl ───────────────────────────────────────────────────────────────

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Settings(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse settings from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Settings(e.to_string()))
    }

    /// Serialize the settings to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Settings(e.to_string()))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            peer_retries: default_peer_retries(),
            rpc_timeout_secs: default_rpc_timeout_secs(),
            daemon_timeout_secs: default_daemon_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let settings = Settings::from_toml_str("").expect("empty settings parse");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.peer_retries, 3);
        assert_eq!(settings.log_format, LogFormat::Human);
    }

    #[test]
    fn overrides_are_applied() {
        let settings = Settings::from_toml_str(
            r#"
log_format = "json"
log_level = "debug"
peer_retries = 0
"#,
        )
        .expect("parse");
        assert_eq!(settings.log_format, LogFormat::Json);
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.peer_retries, 0);
        assert_eq!(settings.rpc_timeout_secs, 30);
    }

    #[test]
    fn rejects_unknown_log_format() {
        let err = Settings::from_toml_str("log_format = \"xml\"").expect_err("bad format");
        assert!(matches!(err, ConfigError::Settings(_)));
    }

    #[test]
    fn toml_round_trip() {
        let settings = Settings {
            peer_retries: 7,
            ..Settings::default()
        };
        let text = settings.to_toml_string().expect("serialize");
        assert_eq!(Settings::from_toml_str(&text).expect("parse"), settings);
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("chia-tools.toml");
        std::fs::write(&path, "rpc_timeout_secs = 5\n").expect("write");
        let settings = Settings::from_toml_file(&path).expect("load");
        assert_eq!(settings.rpc_timeout_secs, 5);
    }
}
