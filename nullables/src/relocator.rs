//! Nullable filesystem for cache relocation: an in-memory file tree.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

use chia_tools_network::relocate::CACHE_MARKER;
use chia_tools_network::{CacheRelocator, RelocateOutcome};

use crate::Journal;

/// Files and directories held in memory. Every operation is journaled.
#[derive(Default)]
pub struct NullCacheRelocator {
    files: RefCell<BTreeMap<PathBuf, Vec<u8>>>,
    dirs: RefCell<BTreeSet<PathBuf>>,
    fail_on: Option<PathBuf>,
    journal: Journal,
}

impl NullCacheRelocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file.
    pub fn with_file(self, path: impl Into<PathBuf>, content: &[u8]) -> Self {
        self.files.borrow_mut().insert(path.into(), content.to_vec());
        self
    }

    /// Make any relocation from `source` fail.
    pub fn failing_on(mut self, source: impl Into<PathBuf>) -> Self {
        self.fail_on = Some(source.into());
        self
    }

    /// Clear a failure set by [`failing_on`](Self::failing_on).
    pub fn without_failure(mut self) -> Self {
        self.fail_on = None;
        self
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn file(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.borrow().get(path).cloned()
    }

    pub fn has_dir(&self, path: &Path) -> bool {
        self.dirs.borrow().contains(path)
    }
}

impl CacheRelocator for NullCacheRelocator {
    fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        self.journal.record(format!("ensure_dir {}", path.display()));
        self.dirs.borrow_mut().insert(path.to_path_buf());
        Ok(())
    }

    fn relocate(&self, source: &Path, destination: &Path) -> io::Result<RelocateOutcome> {
        self.journal.record(format!(
            "relocate {} -> {}",
            source.display(),
            destination.display()
        ));
        if self.fail_on.as_deref() == Some(source) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "null failure"));
        }

        let mut files = self.files.borrow_mut();
        match files.remove(source) {
            Some(content) => {
                files.insert(destination.to_path_buf(), content);
                Ok(RelocateOutcome::Moved)
            }
            None => Ok(RelocateOutcome::SourceMissing),
        }
    }

    fn read_marker(&self, db_dir: &Path) -> io::Result<Option<String>> {
        Ok(self
            .file(&db_dir.join(CACHE_MARKER))
            .map(|content| String::from_utf8_lossy(&content).trim().to_string()))
    }

    fn write_marker(&self, db_dir: &Path, network: &str) -> io::Result<()> {
        self.journal.record(format!("write_marker {network}"));
        self.files
            .borrow_mut()
            .insert(db_dir.join(CACHE_MARKER), network.as_bytes().to_vec());
        Ok(())
    }
}
