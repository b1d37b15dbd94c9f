//! Directory size walking
//!
//! `SizeWalker` totals the bytes under a directory using one of two strategies:
//!
//! - Shallow: lists one level at a time and recurses by hand. A directory that
//!   cannot be listed is logged and counted as zero, so the walk always
//!   produces a total.
//! - Deep: consumes a single recursive enumeration. The first entry whose size
//!   cannot be read aborts the whole walk.
//!
//! Both are single-threaded and blocking.

mod config;
mod deep;
mod shallow;
mod stats;

use std::path::Path;

use crate::entry::{Entry, EntryKind};
use crate::error::Result;
use crate::fs::{FileSystem, OsFileSystem};

pub use config::{Strategy, WalkerConfig};
pub use stats::{QueryStats, WalkOutcome};

pub struct SizeWalker<F = OsFileSystem> {
    fs: F,
    config: WalkerConfig,
}

impl SizeWalker<OsFileSystem> {
    /// Walker over the host filesystem.
    pub fn new(config: WalkerConfig) -> Self {
        Self::with_filesystem(OsFileSystem, config)
    }
}

impl<F: FileSystem> SizeWalker<F> {
    pub fn with_filesystem(fs: F, config: WalkerConfig) -> Self {
        Self { fs, config }
    }

    /// Total the tree at `root` with the configured strategy.
    pub fn walk(&self, root: &Path) -> Result<WalkOutcome> {
        self.walk_with(root, self.config.strategy)
    }

    /// Total the tree at `root` with an explicit strategy.
    pub fn walk_with(&self, root: &Path, strategy: Strategy) -> Result<WalkOutcome> {
        match strategy {
            Strategy::Shallow => Ok(self.total_size_of_directory(root)),
            Strategy::Deep => self.total_size_of_directory_with_deep_recursion(root),
        }
    }

    fn kind_of(&self, entry: &Entry, stats: &mut QueryStats) -> EntryKind {
        stats.kind_queries += 1;
        match entry.try_kind(&self.fs) {
            Ok(kind) => kind,
            Err(err) => {
                tracing::debug!(path = %entry.path().display(), error = %err, "cannot classify entry");
                EntryKind::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeFileSystem, TestTree};
    use std::path::PathBuf;

    fn fake_walker(fs: FakeFileSystem) -> SizeWalker<FakeFileSystem> {
        SizeWalker::with_filesystem(fs, WalkerConfig::default())
    }

    #[test]
    fn test_flat_directory_sums_files() {
        let fs = FakeFileSystem::new()
            .file("/r/a", 10)
            .file("/r/b", 200)
            .file("/r/c", 3000);
        let walker = fake_walker(fs);

        let outcome = walker.total_size_of_directory(Path::new("/r"));
        assert_eq!(outcome.total_bytes, 3210);
        assert_eq!(outcome.stats.entries_visited, 3);
    }

    #[test]
    fn test_empty_subdirectory_contributes_nothing() {
        let fs = FakeFileSystem::new().dir("/r/empty").file("/r/n", 77);
        let walker = fake_walker(fs);

        assert_eq!(walker.total_size_of_directory(Path::new("/r")).total_bytes, 77);
    }

    #[test]
    fn test_strategies_agree_on_three_levels() {
        let fs = FakeFileSystem::new()
            .file("/r/top", 1)
            .file("/r/one/mid", 20)
            .file("/r/one/two/low", 300)
            .file("/r/one/two/three/bottom", 4000);
        let walker = fake_walker(fs);

        let shallow = walker.walk_with(Path::new("/r"), Strategy::Shallow).unwrap();
        let deep = walker.walk_with(Path::new("/r"), Strategy::Deep).unwrap();
        assert_eq!(shallow.total_bytes, 4321);
        assert_eq!(deep.total_bytes, 4321);
    }

    #[test]
    fn test_shallow_skips_unreadable_directory() {
        let fs = FakeFileSystem::new()
            .file("/r/a", 5)
            .file("/r/locked/secret", 1000)
            .file("/r/open/b", 7)
            .unreadable("/r/locked");
        let walker = fake_walker(fs);

        let outcome = walker.walk(Path::new("/r")).unwrap();
        assert_eq!(outcome.total_bytes, 12);
        assert_eq!(outcome.stats.directories_skipped, 1);
    }

    #[test]
    fn test_shallow_unreadable_root_is_zero() {
        let fs = FakeFileSystem::new().file("/r/a", 5).unreadable("/r");
        let walker = fake_walker(fs);

        let outcome = walker.total_size_of_directory(Path::new("/r"));
        assert_eq!(outcome.total_bytes, 0);
        assert_eq!(outcome.stats.directories_skipped, 1);
    }

    #[test]
    fn test_shallow_missing_size_counts_as_zero() {
        let fs = FakeFileSystem::new()
            .file("/r/a", 5)
            .file("/r/b", 9)
            .broken_metadata("/r/b");
        let walker = fake_walker(fs);

        assert_eq!(walker.total_size_of_directory(Path::new("/r")).total_bytes, 5);
    }

    #[test]
    fn test_deep_metadata_failure_is_fatal() {
        let fs = FakeFileSystem::new()
            .file("/r/a", 5)
            .file("/r/sub/b", 9)
            .broken_metadata("/r/sub/b");
        let walker = fake_walker(fs);

        let err = walker
            .total_size_of_directory_with_deep_recursion(Path::new("/r"))
            .unwrap_err();
        match err {
            crate::Error::Metadata { path, .. } => assert_eq!(path, PathBuf::from("/r/sub/b")),
            other => panic!("expected metadata error, got {other:?}"),
        }
    }

    #[test]
    fn test_deep_skips_unreadable_subdirectory() {
        let fs = FakeFileSystem::new()
            .file("/r/a", 5)
            .file("/r/locked/secret", 1000)
            .unreadable("/r/locked");
        let walker = fake_walker(fs);

        let outcome = walker.walk_with(Path::new("/r"), Strategy::Deep).unwrap();
        assert_eq!(outcome.total_bytes, 5);
        assert_eq!(outcome.stats.directories_skipped, 1);
    }

    #[test]
    fn test_deep_unreadable_root_is_error() {
        let fs = FakeFileSystem::new().file("/r/a", 5).unreadable("/r");
        let walker = fake_walker(fs);

        let err = walker.walk_with(Path::new("/r"), Strategy::Deep).unwrap_err();
        assert!(matches!(err, crate::Error::Root { .. }));
    }

    #[test]
    fn test_symlinks_and_devices_use_their_own_size() {
        let fs = FakeFileSystem::new()
            .file("/r/a", 10)
            .node("/r/link", EntryKind::SymbolicLink, 4)
            .node("/r/tty", EntryKind::Device, 0)
            .node("/r/pipe", EntryKind::Unknown, 0);
        let walker = fake_walker(fs);

        assert_eq!(walker.total_size_of_directory(Path::new("/r")).total_bytes, 14);
        assert_eq!(
            walker
                .total_size_of_directory_with_deep_recursion(Path::new("/r"))
                .unwrap()
                .total_bytes,
            14
        );
    }

    #[test]
    fn test_counters_are_per_walk() {
        let fs = FakeFileSystem::new().file("/r/a", 1).file("/r/d/b", 2);
        let walker = fake_walker(fs);

        let first = walker.total_size_of_directory(Path::new("/r"));
        let second = walker.total_size_of_directory(Path::new("/r"));
        assert_eq!(first.stats, second.stats);
        // a, d, d/b are classified; a and d/b are sized
        assert_eq!(first.stats.kind_queries, 3);
        assert_eq!(first.stats.size_queries, 2);

        let deep = walker
            .total_size_of_directory_with_deep_recursion(Path::new("/r"))
            .unwrap();
        assert_eq!(deep.stats.kind_queries, 0);
        assert_eq!(deep.stats.size_queries, 3);
    }

    #[test]
    fn test_files_in_directory() {
        let fs = FakeFileSystem::new()
            .file("/r/a", 1)
            .file("/r/d/b", 2)
            .unreadable("/r/d");
        let walker = fake_walker(fs);

        let mut names: Vec<PathBuf> = walker
            .files_in_directory(Path::new("/r"))
            .into_iter()
            .map(|e| e.path().to_path_buf())
            .collect();
        names.sort();
        assert_eq!(names, vec![PathBuf::from("/r/a"), PathBuf::from("/r/d")]);
        assert!(walker.files_in_directory(Path::new("/r/d")).is_empty());
    }

    #[test]
    fn test_files_in_directory_reads_through_walker_filesystem() {
        let fs = FakeFileSystem::new().file("/r/a", 42).dir("/r/sub");
        let walker = fake_walker(fs);

        let mut entries = walker.files_in_directory(Path::new("/r"));
        entries.sort_by(|a, b| a.path().cmp(b.path()));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind(&walker.fs), EntryKind::File);
        assert_eq!(entries[0].size(&walker.fs), Some(42));
        assert_eq!(entries[1].kind(&walker.fs), EntryKind::Directory);
        assert_eq!(entries[1].size(&walker.fs), None);
    }

    #[test]
    fn test_real_tree_both_strategies() {
        let tree = TestTree::new();
        tree.add_file("top.bin", 100);
        tree.add_file("a/mid.bin", 20);
        tree.add_file("a/b/low.bin", 3);
        tree.add_dir("a/b/empty");

        let walker = SizeWalker::new(WalkerConfig::default());
        let shallow = walker.walk_with(tree.path(), Strategy::Shallow).unwrap();
        let deep = walker.walk_with(tree.path(), Strategy::Deep).unwrap();
        assert_eq!(shallow.total_bytes, 123);
        assert_eq!(deep.total_bytes, 123);
    }
}
