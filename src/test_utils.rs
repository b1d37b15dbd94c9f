//! Test utilities: temporary directory trees and an in-memory filesystem.
//!
//! This module is only compiled for tests and benchmarks.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::entry::EntryKind;
use crate::fs::{DeepEntries, FileSystem};

/// A temporary directory tree for testing.
///
/// The tree is automatically cleaned up when dropped.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a file of exactly `size` bytes.
    ///
    /// Creates parent directories as needed.
    pub fn add_file(&self, path: &str, size: usize) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, vec![b'x'; size]).expect("Failed to write file");
        full_path
    }

    /// Add an (empty) directory.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Add a symbolic link at `path` pointing to `target`.
    #[cfg(unix)]
    pub fn add_symlink(&self, path: &str, target: impl AsRef<Path>) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::os::unix::fs::symlink(target, &full_path).expect("Failed to create symlink");
        full_path
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
struct FakeNode {
    kind: EntryKind,
    size: u64,
}

/// In-memory filesystem with injectable failures.
///
/// Paths are absolute-looking keys like `/r/a`; parents are created as
/// directories automatically.
#[derive(Debug, Default, Clone)]
pub struct FakeFileSystem {
    nodes: BTreeMap<PathBuf, FakeNode>,
    unreadable: BTreeSet<PathBuf>,
    broken_metadata: BTreeSet<PathBuf>,
}

impl FakeFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a regular file.
    pub fn file(self, path: impl AsRef<Path>, size: u64) -> Self {
        self.node(path, EntryKind::File, size)
    }

    /// Add a directory.
    pub fn dir(self, path: impl AsRef<Path>) -> Self {
        self.node(path, EntryKind::Directory, 0)
    }

    /// Add a node of any kind.
    pub fn node(mut self, path: impl AsRef<Path>, kind: EntryKind, size: u64) -> Self {
        let path = path.as_ref();
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.nodes.entry(ancestor.to_path_buf()).or_insert(FakeNode {
                kind: EntryKind::Directory,
                size: 0,
            });
        }
        self.nodes.insert(path.to_path_buf(), FakeNode { kind, size });
        self
    }

    /// Listing `path` fails with permission denied.
    pub fn unreadable(mut self, path: impl AsRef<Path>) -> Self {
        self.unreadable.insert(path.as_ref().to_path_buf());
        self
    }

    /// Every metadata lookup on `path` fails.
    pub fn broken_metadata(mut self, path: impl AsRef<Path>) -> Self {
        self.broken_metadata.insert(path.as_ref().to_path_buf());
        self
    }

    fn lookup(&self, path: &Path) -> io::Result<FakeNode> {
        if self.broken_metadata.contains(path) {
            return Err(io::Error::other(format!(
                "injected metadata failure for {}",
                path.display()
            )));
        }
        self.nodes
            .get(path)
            .copied()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such entry"))
    }

    fn children(&self, dir: &Path) -> Vec<PathBuf> {
        self.nodes
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect()
    }

    fn collect_deep(&self, dir: &Path, out: &mut Vec<io::Result<PathBuf>>) {
        for child in self.children(dir) {
            let is_dir = self
                .nodes
                .get(&child)
                .is_some_and(|n| n.kind == EntryKind::Directory);
            out.push(Ok(child.clone()));
            if is_dir {
                if self.unreadable.contains(&child) {
                    out.push(Err(permission_denied(&child)));
                } else {
                    self.collect_deep(&child, out);
                }
            }
        }
    }
}

fn permission_denied(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("permission denied: {}", path.display()),
    )
}

impl FileSystem for FakeFileSystem {
    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        if self.unreadable.contains(dir) {
            return Err(permission_denied(dir));
        }
        let node = self
            .nodes
            .get(dir)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such directory"))?;
        if node.kind != EntryKind::Directory {
            return Err(io::Error::other("not a directory"));
        }
        Ok(self.children(dir))
    }

    fn deep_enumerate(&self, root: &Path) -> io::Result<DeepEntries<'_>> {
        self.list(root)?;
        let mut out = Vec::new();
        self.collect_deep(root, &mut out);
        Ok(Box::new(out.into_iter()))
    }

    fn stat_size(&self, path: &Path) -> io::Result<Option<u64>> {
        let node = self.lookup(path)?;
        if node.kind == EntryKind::Directory {
            Ok(None)
        } else {
            Ok(Some(node.size))
        }
    }

    fn stat_kind(&self, path: &Path) -> io::Result<EntryKind> {
        Ok(self.lookup(path)?.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_creates_temp_dir() {
        let tree = TestTree::new();
        assert!(tree.path().exists());
    }

    #[test]
    fn test_tree_add_file_has_size() {
        let tree = TestTree::new();
        let file = tree.add_file("nested/dir/f.bin", 17);
        assert_eq!(fs::metadata(file).unwrap().len(), 17);
    }

    #[test]
    fn test_fake_creates_parents() {
        let fs = FakeFileSystem::new().file("/r/a/b/c", 1);
        assert_eq!(fs.stat_kind(Path::new("/r/a")).unwrap(), EntryKind::Directory);
        assert_eq!(fs.list(Path::new("/r/a")).unwrap(), vec![PathBuf::from("/r/a/b")]);
    }

    #[test]
    fn test_fake_deep_enumerate_reports_unreadable() {
        let fs = FakeFileSystem::new()
            .file("/r/x/secret", 1)
            .file("/r/y", 2)
            .unreadable("/r/x");
        let items: Vec<_> = fs.deep_enumerate(Path::new("/r")).unwrap().collect();
        assert_eq!(items.len(), 3);
        assert!(items[1].is_err());
    }
}
