//! Strongly-typed identifiers for containers and cursor registrations.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`VecInstanceId`] allocation.
static VEC_INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a container.
///
/// Allocated from a monotonic atomic counter via [`VecInstanceId::next`].
/// Every cursor records the id of the container that issued it, so a
/// cursor handed to a different container is caught instead of silently
/// resolving against an unrelated registry slot. Two containers never
/// share an id, even if one is dropped and another allocated at the same
/// address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VecInstanceId(u64);

impl VecInstanceId {
    /// Allocate a fresh, unique instance ID. Thread-safe.
    pub fn next() -> Self {
        Self(VEC_INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for VecInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registration epoch of a cursor within one container.
///
/// Each registration takes the next epoch from the container's counter.
/// Registry slots are trimmed and re-filled, so the slot index alone does
/// not identify a registration; the `(index, epoch)` pair does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CursorEpoch(pub u64);

impl CursorEpoch {
    /// The epoch following this one.
    #[must_use]
    pub fn succ(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for CursorEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CursorEpoch {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
