use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the home directory for the default chia root")]
    NoHomeDir,

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing config: {0}")]
    Parse(String),

    #[error("error serializing config: {0}")]
    Serialize(String),

    #[error("invalid field path {0:?}")]
    InvalidPath(String),

    #[error("field path {0} does not exist in the config")]
    UnknownPath(String),

    #[error("cannot set {path}: existing value is a {found}, new value is a {expected}")]
    KindMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid value for {path}: {reason}")]
    InvalidValue { path: String, reason: String },

    #[error("config is missing required field {0}")]
    MissingField(String),

    #[error("environment variable {var}: {source}")]
    Env {
        var: String,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("settings error: {0}")]
    Settings(String),

    #[error(transparent)]
    Types(#[from] chia_tools_types::ToolsError),
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn env(var: &str, source: ConfigError) -> Self {
        Self::Env {
            var: var.to_string(),
            source: Box::new(source),
        }
    }
}
