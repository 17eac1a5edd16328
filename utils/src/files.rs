//! Recursive file listing for disk usage reports.

use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Paths (relative to the scanned root) hidden from reports by default:
/// typically small or transient files.
pub const DEFAULT_EXCLUSIONS: [&str; 4] = [
    r"\.DS_Store$",
    r"data_layer/db/server_files_location.*/.*delta.*",
    r"wallet/db/temp.*",
    r"run/.*",
];

/// Options for [`collect_files`].
#[derive(Clone, Debug, Default)]
pub struct FileScanOptions {
    /// Include files matched by [`DEFAULT_EXCLUSIONS`].
    pub all_files: bool,
    /// Sort largest first instead of walk order.
    pub sort_by_size: bool,
}

/// A regular file found under the scanned root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEntry {
    pub size: u64,
    /// Path relative to the scanned root.
    pub path: PathBuf,
}

/// Walk `root` and return every regular file with its size.
///
/// Unreadable entries are skipped rather than aborting the scan.
pub fn collect_files(root: &Path, options: &FileScanOptions) -> Vec<FileEntry> {
    let exclusions: Vec<Regex> = if options.all_files {
        Vec::new()
    } else {
        DEFAULT_EXCLUSIONS
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect()
    };

    let mut files: Vec<FileEntry> = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(root).ok()?.to_path_buf();
            let display = relative.to_string_lossy().replace('\\', "/");
            if exclusions.iter().any(|re| re.is_match(&display)) {
                return None;
            }
            let size = entry.metadata().ok()?.len();
            Some(FileEntry {
                size,
                path: relative,
            })
        })
        .collect();

    if options.sort_by_size {
        files.sort_by(|a, b| b.size.cmp(&a.size));
    }

    tracing::debug!(root = %root.display(), count = files.len(), "collected files");
    files
}
