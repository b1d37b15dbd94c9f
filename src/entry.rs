//! Filesystem entries and their classification

use std::fmt;
use std::fs::FileType;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::fs::FileSystem;

const S_IFMT: u32 = 0o170000;
const S_IFSOCK: u32 = 0o140000;
const S_IFLNK: u32 = 0o120000;
const S_IFREG: u32 = 0o100000;
const S_IFBLK: u32 = 0o060000;
const S_IFDIR: u32 = 0o040000;
const S_IFCHR: u32 = 0o020000;
const S_IFIFO: u32 = 0o010000;

/// Logical kind of a filesystem node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    File,
    Directory,
    SymbolicLink,
    Device,
    Unknown,
}

impl EntryKind {
    /// Classify a `std::fs::FileType` as reported by `symlink_metadata`.
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            return EntryKind::SymbolicLink;
        }
        if file_type.is_dir() {
            return EntryKind::Directory;
        }
        if file_type.is_file() {
            return EntryKind::File;
        }
        classify_special(file_type)
    }

    /// Classify a raw POSIX `st_mode` value.
    pub fn from_mode(mode: u32) -> Self {
        match mode & S_IFMT {
            S_IFREG => EntryKind::File,
            S_IFDIR => EntryKind::Directory,
            S_IFLNK => EntryKind::SymbolicLink,
            S_IFBLK | S_IFCHR => EntryKind::Device,
            S_IFIFO | S_IFSOCK => EntryKind::Unknown,
            _ => EntryKind::Unknown,
        }
    }

    /// Classify a type name such as `"regular"`, `"directory"` or `"fifo"`.
    ///
    /// Matching is case-insensitive. Anything unrecognized is `Unknown`.
    pub fn from_type_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "regular" | "file" => EntryKind::File,
            "directory" | "dir" => EntryKind::Directory,
            "symlink" | "symbolic-link" | "link" => EntryKind::SymbolicLink,
            "block" | "block-special" | "char" | "character-special" => EntryKind::Device,
            "fifo" | "pipe" | "socket" => EntryKind::Unknown,
            other => {
                tracing::debug!(type_name = other, "unrecognized entry type");
                EntryKind::Unknown
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Directory => "directory",
            EntryKind::SymbolicLink => "symbolic-link",
            EntryKind::Device => "device",
            EntryKind::Unknown => "unknown",
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(unix)]
fn classify_special(file_type: FileType) -> EntryKind {
    use std::os::unix::fs::FileTypeExt;

    if file_type.is_block_device() || file_type.is_char_device() {
        EntryKind::Device
    } else {
        // fifo, socket, or something newer than we know about
        EntryKind::Unknown
    }
}

#[cfg(not(unix))]
fn classify_special(_file_type: FileType) -> EntryKind {
    EntryKind::Unknown
}

/// One node discovered during a walk.
///
/// Nothing is cached: `kind` and `size` ask the filesystem on every call, so
/// two calls can disagree if the tree changes underneath us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    path: PathBuf,
}

impl Entry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn try_kind<F: FileSystem + ?Sized>(&self, fs: &F) -> io::Result<EntryKind> {
        fs.stat_kind(&self.path)
    }

    pub fn try_size<F: FileSystem + ?Sized>(&self, fs: &F) -> io::Result<Option<u64>> {
        fs.stat_size(&self.path)
    }

    /// Kind of this entry. Symlinks are not followed; a failed lookup is `Unknown`.
    pub fn kind<F: FileSystem + ?Sized>(&self, fs: &F) -> EntryKind {
        self.try_kind(fs).unwrap_or(EntryKind::Unknown)
    }

    /// Byte size of this entry, `None` for directories or when metadata is unavailable.
    pub fn size<F: FileSystem + ?Sized>(&self, fs: &F) -> Option<u64> {
        self.try_size(fs).ok().flatten()
    }

    /// Describe this entry as seen through `fs`.
    pub fn display<'a, F: FileSystem + ?Sized>(&'a self, fs: &'a F) -> EntryDisplay<'a, F> {
        EntryDisplay { entry: self, fs }
    }
}

/// Helper returned by [`Entry::display`].
pub struct EntryDisplay<'a, F: ?Sized> {
    entry: &'a Entry,
    fs: &'a F,
}

impl<F: FileSystem + ?Sized> fmt::Display for EntryDisplay<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "File: {} file size = ", self.entry.path.display())?;
        match self.entry.size(self.fs) {
            Some(size) => write!(f, "{}", size)?,
            None => f.write_str("-")?,
        }
        write!(f, "  type = {}", self.entry.kind(self.fs))
    }
}
