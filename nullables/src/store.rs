//! Nullable config store: an in-memory document that records edits and saves.

use chia_tools_config::{ConfigDocument, ConfigError, ConfigStore, FieldPath, Value};

use crate::Journal;

/// A [`ConfigStore`] that never touches disk.
pub struct NullConfigStore {
    document: ConfigDocument,
    saved: Option<ConfigDocument>,
    saves: usize,
    fail_save: bool,
    journal: Journal,
}

impl NullConfigStore {
    pub fn new(document: ConfigDocument) -> Self {
        Self {
            document,
            saved: None,
            saves: 0,
            fail_save: false,
            journal: Journal::new(),
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(ConfigDocument::from_yaml_str(yaml)?))
    }

    /// Make every save fail.
    pub fn failing_save(mut self) -> Self {
        self.fail_save = true;
        self
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// The document as of the last successful save.
    pub fn saved(&self) -> Option<&ConfigDocument> {
        self.saved.as_ref()
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl ConfigStore for NullConfigStore {
    fn document(&self) -> &ConfigDocument {
        &self.document
    }

    fn set_field(&mut self, path: &FieldPath, value: Value) -> Result<(), ConfigError> {
        self.journal.record(format!("set_field {path}"));
        self.document.set(path, value)
    }

    fn save(&mut self) -> Result<(), ConfigError> {
        self.journal.record("save");
        if self.fail_save {
            return Err(ConfigError::Serialize("null save failure".into()));
        }
        self.saves += 1;
        self.saved = Some(self.document.clone());
        Ok(())
    }
}
