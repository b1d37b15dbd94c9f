//! Configuration types for size walkers

use serde::Serialize;

/// How the tree is enumerated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// List one level at a time and recurse into each subdirectory.
    /// Unreadable directories count as zero.
    #[default]
    Shallow,
    /// Consume one recursive enumeration of the whole tree.
    /// Any metadata failure aborts the walk.
    Deep,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Shallow => "shallow",
            Strategy::Deep => "deep",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for size walking behavior.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    pub strategy: Strategy,
}
