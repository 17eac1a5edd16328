//! Locating the chia root and its config file.

use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Environment variable that overrides the chia root.
pub const CHIA_ROOT_ENV: &str = "CHIA_ROOT";

/// Resolve the chia root: an explicit value (flag or `CHIA_ROOT`) wins,
/// otherwise `~/.chia/mainnet`. A leading `~` is expanded.
pub fn resolve_chia_root(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(path) => expand_home(path),
        None => {
            let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
            Ok(home.join(".chia").join("mainnet"))
        }
    }
}

/// `<root>/config/config.yaml`.
pub fn default_config_path(chia_root: &Path) -> PathBuf {
    chia_root.join("config").join("config.yaml")
}

/// Resolve a path from the config (e.g. `config/ssl/daemon/private_daemon.crt`)
/// against the chia root. Absolute paths are returned unchanged.
pub fn resolve_in_root(chia_root: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        chia_root.join(candidate)
    }
}

fn expand_home(path: &Path) -> Result<PathBuf, ConfigError> {
    match path.strip_prefix("~") {
        Ok(rest) => {
            let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
            Ok(home.join(rest))
        }
        Err(_) => Ok(path.to_path_buf()),
    }
}
