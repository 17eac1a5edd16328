//! Access to a chia installation's `config.yaml`.
//!
//! The document is held as a generic YAML tree so fields this crate knows
//! nothing about survive a load/save cycle untouched. Fields are addressed by
//! [`FieldPath`]s, parsed once and validated against the loaded document
//! before anything is mutated.

pub mod defaults;
pub mod document;
pub mod env;
pub mod error;
pub mod path;
pub mod peers;
pub mod root;
pub mod settings;
pub mod store;

pub use defaults::{default_document, DEFAULT_CONFIG_YAML};
pub use document::{ConfigDocument, LeafPolicy};
pub use env::{env_overrides, parse_env_overrides, EnvOverride};
pub use error::ConfigError;
pub use path::{FieldPath, Segment};
pub use root::{default_config_path, resolve_chia_root, CHIA_ROOT_ENV};
pub use settings::Settings;
pub use store::{ConfigStore, YamlConfigStore};

/// Re-exported so callers can build values without depending on `serde_yaml`.
pub use serde_yaml::Value;
