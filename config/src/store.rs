//! Loading and persisting the config document.

use serde_yaml::Value;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{ConfigDocument, ConfigError, FieldPath};

/// Owner of a config document for the duration of a command.
///
/// Mutations are staged in memory and only become durable on [`save`].
///
/// [`save`]: ConfigStore::save
pub trait ConfigStore {
    /// The current in-memory document.
    fn document(&self) -> &ConfigDocument;

    /// Set one field in memory.
    fn set_field(&mut self, path: &FieldPath, value: Value) -> Result<(), ConfigError>;

    /// Persist the in-memory document.
    fn save(&mut self) -> Result<(), ConfigError>;
}

/// A [`ConfigStore`] backed by a `config.yaml` on disk.
pub struct YamlConfigStore {
    config_path: PathBuf,
    chia_root: PathBuf,
    document: ConfigDocument,
}

impl YamlConfigStore {
    /// Load `config_path`, interpreting relative paths inside it against
    /// `chia_root`.
    pub fn load(
        config_path: impl Into<PathBuf>,
        chia_root: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let config_path = config_path.into();
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| ConfigError::io(&config_path, e))?;
        let document = ConfigDocument::from_yaml_str(&content)?;
        tracing::debug!(path = %config_path.display(), "loaded config");
        Ok(Self {
            config_path,
            chia_root: chia_root.into(),
            document,
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn chia_root(&self) -> &Path {
        &self.chia_root
    }

    pub fn document_mut(&mut self) -> &mut ConfigDocument {
        &mut self.document
    }
}

impl ConfigStore for YamlConfigStore {
    fn document(&self) -> &ConfigDocument {
        &self.document
    }

    fn set_field(&mut self, path: &FieldPath, value: Value) -> Result<(), ConfigError> {
        self.document.set(path, value)
    }

    /// Write to a temporary file in the same directory, then rename over the
    /// original so readers never observe a half-written config.
    fn save(&mut self) -> Result<(), ConfigError> {
        let yaml = self.document.to_yaml_string()?;
        let dir = self
            .config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp =
            tempfile::NamedTempFile::new_in(dir).map_err(|e| ConfigError::io(dir, e))?;
        tmp.write_all(yaml.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| ConfigError::io(tmp.path(), e))?;

        if let Ok(metadata) = std::fs::metadata(&self.config_path) {
            // Keep the original mode; the config may hold secrets.
            let _ = std::fs::set_permissions(tmp.path(), metadata.permissions());
        }

        tmp.persist(&self.config_path)
            .map_err(|e| ConfigError::io(&self.config_path, e.error))?;
        tracing::debug!(path = %self.config_path.display(), "saved config");
        Ok(())
    }
}
