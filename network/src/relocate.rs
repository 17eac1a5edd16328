//! Moving per-network cache files in and out of the active `db/` directory.
//!
//! The full node keeps two derived caches, `db/sub-epoch-summaries` and
//! `db/height-to-hash`, that are only valid for one network. Each network's
//! copy is archived under `db/<network>/` while another network is active.

use std::io;
use std::path::{Path, PathBuf};

/// File names of the per-network cache files inside `db/`.
pub const CACHE_FILES: [&str; 2] = ["sub-epoch-summaries", "height-to-hash"];

/// Marker inside `db/` naming the network the active cache files belong to.
pub const CACHE_MARKER: &str = ".cache-network";

/// `<root>/db`.
pub fn db_dir(chia_root: &Path) -> PathBuf {
    chia_root.join("db")
}

/// Result of a single relocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelocateOutcome {
    Moved,
    /// Nothing to move. Not an error.
    SourceMissing,
}

/// Filesystem operations the network switch needs.
pub trait CacheRelocator {
    /// Create `path` and its parents. Succeeds if it already exists.
    fn ensure_dir(&self, path: &Path) -> io::Result<()>;

    /// Move `source` to `destination`, replacing any existing destination.
    /// A missing source is a no-op.
    fn relocate(&self, source: &Path, destination: &Path) -> io::Result<RelocateOutcome>;

    /// The network recorded in `<db_dir>/.cache-network`, if any.
    fn read_marker(&self, db_dir: &Path) -> io::Result<Option<String>>;

    /// Record `network` as the owner of the active cache files.
    fn write_marker(&self, db_dir: &Path, network: &str) -> io::Result<()>;
}

/// [`CacheRelocator`] over the real filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsCacheRelocator;

impl CacheRelocator for FsCacheRelocator {
    fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        tracing::debug!(directory = %path.display(), "ensuring directory exists");
        std::fs::create_dir_all(path)
    }

    fn relocate(&self, source: &Path, destination: &Path) -> io::Result<RelocateOutcome> {
        match std::fs::symlink_metadata(source) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(
                    source = %source.display(),
                    dest = %destination.display(),
                    "source doesn't exist, skipping move"
                );
                return Ok(RelocateOutcome::SourceMissing);
            }
            Err(e) => return Err(e),
        }

        match std::fs::remove_file(destination) {
            Ok(()) => {
                tracing::debug!(dest = %destination.display(), "removed existing destination");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }

        if let Err(e) = std::fs::rename(source, destination) {
            if !crosses_devices(&e) {
                return Err(e);
            }
            tracing::debug!(
                source = %source.display(),
                dest = %destination.display(),
                "rename crosses devices, copying instead"
            );
            std::fs::copy(source, destination)?;
            std::fs::remove_file(source)?;
        }

        tracing::debug!(source = %source.display(), dest = %destination.display(), "moved");
        Ok(RelocateOutcome::Moved)
    }

    fn read_marker(&self, db_dir: &Path) -> io::Result<Option<String>> {
        match std::fs::read_to_string(db_dir.join(CACHE_MARKER)) {
            Ok(content) => {
                let name = content.trim();
                Ok((!name.is_empty()).then(|| name.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write_marker(&self, db_dir: &Path, network: &str) -> io::Result<()> {
        std::fs::write(db_dir.join(CACHE_MARKER), format!("{network}\n"))
    }
}

/// `EXDEV` on unix, `ERROR_NOT_SAME_DEVICE` on windows.
fn crosses_devices(e: &io::Error) -> bool {
    let code = if cfg!(windows) { 17 } else { 18 };
    e.raw_os_error() == Some(code)
}
