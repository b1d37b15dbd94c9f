//! The filesystem boundary consumed by the walker

use std::io;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::entry::EntryKind;

/// Lazy sequence of descendant paths produced by a deep enumeration.
pub type DeepEntries<'a> = Box<dyn Iterator<Item = io::Result<PathBuf>> + 'a>;

/// Metadata operations the walker needs from a filesystem.
///
/// None of these follow symbolic links.
pub trait FileSystem {
    /// List the immediate children of `dir`.
    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// Every descendant of `root` at all depths, excluding `root` itself.
    ///
    /// Fails up front if `root` cannot be opened. Directories that cannot be
    /// read further down show up as `Err` items in the sequence.
    fn deep_enumerate(&self, root: &Path) -> io::Result<DeepEntries<'_>>;

    /// Byte size of `path`, `None` for directories.
    fn stat_size(&self, path: &Path) -> io::Result<Option<u64>>;

    fn stat_kind(&self, path: &Path) -> io::Result<EntryKind>;
}

/// The host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut children = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            children.push(entry?.path());
        }
        Ok(children)
    }

    fn deep_enumerate(&self, root: &Path) -> io::Result<DeepEntries<'_>> {
        // Surface an unreadable root now instead of as the first item.
        std::fs::read_dir(root)?;

        let walk = WalkBuilder::new(root)
            .standard_filters(false)
            .parents(false)
            .follow_links(false)
            .build();

        Ok(Box::new(walk.filter_map(|result| match result {
            Ok(entry) if entry.depth() == 0 => None,
            Ok(entry) => Some(Ok(entry.into_path())),
            Err(err) => Some(Err(walk_error_to_io(err))),
        })))
    }

    fn stat_size(&self, path: &Path) -> io::Result<Option<u64>> {
        let meta = path.symlink_metadata()?;
        if meta.is_dir() {
            Ok(None)
        } else {
            Ok(Some(meta.len()))
        }
    }

    fn stat_kind(&self, path: &Path) -> io::Result<EntryKind> {
        let meta = path.symlink_metadata()?;
        Ok(EntryKind::from_file_type(meta.file_type()))
    }
}

fn walk_error_to_io(err: ignore::Error) -> io::Error {
    let message = err.to_string();
    err.into_io_error()
        .unwrap_or_else(|| io::Error::other(message))
}
