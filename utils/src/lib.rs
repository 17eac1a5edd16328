//! Shared utilities for chia-tools.

pub mod confirm;
pub mod files;
pub mod logging;
pub mod size;
pub mod table;

pub use confirm::ConfirmPolicy;
pub use files::{collect_files, FileEntry, FileScanOptions};
pub use logging::{init_logging, LogFormat};
pub use size::human_readable_size;
pub use table::render_rows;
