//! One level at a time, recursing into subdirectories by hand

use std::path::Path;

use crate::entry::Entry;
use crate::fs::FileSystem;

use super::{QueryStats, SizeWalker, WalkOutcome};

impl<F: FileSystem> SizeWalker<F> {
    /// Entries directly inside `dir`. Empty if the directory cannot be listed.
    pub fn files_in_directory(&self, dir: &Path) -> Vec<Entry> {
        match self.fs.list(dir) {
            Ok(children) => children.into_iter().map(Entry::new).collect(),
            Err(err) => {
                tracing::warn!(path = %dir.display(), error = %err, "could not read directory");
                Vec::new()
            }
        }
    }

    /// Total bytes under `dir`, recursing one listing at a time.
    ///
    /// Never fails: a directory that cannot be listed contributes zero and is
    /// counted in `directories_skipped`.
    pub fn total_size_of_directory(&self, dir: &Path) -> WalkOutcome {
        let mut stats = QueryStats::default();
        let total_bytes = self.shallow_size(dir, &mut stats);
        tracing::debug!(
            root = %dir.display(),
            total_bytes,
            skipped = stats.directories_skipped,
            "shallow walk finished"
        );
        WalkOutcome { total_bytes, stats }
    }

    fn shallow_size(&self, dir: &Path, stats: &mut QueryStats) -> u64 {
        let children = match self.fs.list(dir) {
            Ok(children) => children,
            Err(err) => {
                tracing::warn!(path = %dir.display(), error = %err, "could not read directory");
                stats.directories_skipped += 1;
                return 0;
            }
        };

        let mut size = 0u64;
        for path in children {
            // Entry lives for this iteration only
            let entry = Entry::new(path);
            stats.entries_visited += 1;

            let contribution = if self.kind_of(&entry, stats).is_dir() {
                self.shallow_size(entry.path(), stats)
            } else {
                self.size_of(&entry, stats).unwrap_or(0)
            };
            size = size.saturating_add(contribution);
        }

        size
    }

    fn size_of(&self, entry: &Entry, stats: &mut QueryStats) -> Option<u64> {
        stats.size_queries += 1;
        match entry.try_size(&self.fs) {
            Ok(size) => size,
            Err(err) => {
                tracing::debug!(path = %entry.path().display(), error = %err, "size unavailable");
                None
            }
        }
    }
}
