//! Treesize - sum the disk usage of a directory tree

pub mod entry;
pub mod error;
pub mod fs;
pub mod logging;
pub mod report;
pub mod walker;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use entry::{Entry, EntryDisplay, EntryKind};
pub use error::{Error, Result};
pub use fs::{FileSystem, OsFileSystem};
pub use report::{ReportOptions, SizeReport, format_size, print_report, print_reports_json};
pub use walker::{QueryStats, SizeWalker, Strategy, WalkOutcome, WalkerConfig};
