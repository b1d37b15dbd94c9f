//! Per-walk query counters

use serde::Serialize;

/// Counters collected during a single walk.
///
/// Each walk starts from zero, so concurrent walks never share counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueryStats {
    /// Size metadata lookups
    pub size_queries: u64,
    /// Kind metadata lookups
    pub kind_queries: u64,
    /// Entries seen below the root
    pub entries_visited: u64,
    /// Directories that could not be read and were counted as zero
    pub directories_skipped: u64,
}

/// Result of a completed walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WalkOutcome {
    pub total_bytes: u64,
    pub stats: QueryStats,
}
