//! Single recursive enumeration of the whole tree

use std::path::Path;

use crate::error::{Error, Result};
use crate::fs::FileSystem;

use super::{QueryStats, SizeWalker, WalkOutcome};

impl<F: FileSystem> SizeWalker<F> {
    /// Total bytes under `root` from one flat enumeration of all descendants.
    ///
    /// Every yielded entry is sized without looking at its kind; directories
    /// report no size so they add nothing. The first entry whose size cannot
    /// be read fails the whole walk with [`Error::Metadata`]. Subdirectories
    /// the enumerator itself cannot open are logged and skipped.
    pub fn total_size_of_directory_with_deep_recursion(&self, root: &Path) -> Result<WalkOutcome> {
        let entries = self.fs.deep_enumerate(root).map_err(|source| Error::Root {
            path: root.to_path_buf(),
            source,
        })?;

        let mut stats = QueryStats::default();
        let mut total_bytes = 0u64;

        for item in entries {
            let path = match item {
                Ok(path) => path,
                Err(err) => {
                    tracing::warn!(root = %root.display(), error = %err, "enumeration error");
                    stats.directories_skipped += 1;
                    continue;
                }
            };
            stats.entries_visited += 1;
            stats.size_queries += 1;

            match self.fs.stat_size(&path) {
                Ok(size) => total_bytes = total_bytes.saturating_add(size.unwrap_or(0)),
                Err(source) => return Err(Error::Metadata { path, source }),
            }
        }

        tracing::debug!(
            root = %root.display(),
            total_bytes,
            skipped = stats.directories_skipped,
            "deep walk finished"
        );
        Ok(WalkOutcome { total_bytes, stats })
    }
}
