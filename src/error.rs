//! Error types for treesize

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Size metadata for an entry could not be read during a deep walk.
    #[error("cannot read metadata for '{}': {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The walk root could not be opened.
    #[error("cannot open '{}': {source}", path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
