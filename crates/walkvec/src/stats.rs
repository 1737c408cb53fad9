//! Rebase and reallocation counters.
//!
//! [`WalkStats`] accumulates over the life of a container (or since the last
//! [`WalkVec::reset_stats`](crate::WalkVec::reset_stats)), letting callers
//! check that the cursor cost model holds for their workload.

/// Cumulative counters for one container.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Number of times the backing store moved to a new allocation.
    pub reallocations: u64,
    /// Number of mutating calls that walked the cursor registry.
    pub rebase_passes: u64,
    /// Total cursor positions changed across all rebase passes.
    pub cursors_rebased: u64,
    /// Total cursors whose element was removed underneath them.
    pub cursors_displaced: u64,
    /// Largest number of cursors registered at once.
    pub peak_live_cursors: usize,
}
