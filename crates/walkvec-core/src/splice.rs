//! Logical splices and the pure cursor rebase function.
//!
//! A [`Splice`] describes what a mutating call did to the logical sequence:
//! `count` slots inserted at `at`, or the slots `[start, end)` removed.
//! [`Splice::rebase`] maps a cursor position from before the splice to the
//! position that refers to the same logical element afterwards.
//!
//! Cursor positions are logical indices, not addresses. A reallocation of
//! the backing store therefore never moves a cursor on its own; only the
//! logical splice does. Pure capacity changes (`reserve`, `shrink_to_fit`)
//! produce no splice at all.
//!
//! ```text
//! Insert { at: 2, count: 3 }           Remove { start: 1, end: 3 }
//!
//!   before  a b c d                      before  a b c d e
//!           0 1 2 3                              0 1 2 3 4
//!   after   a b _ _ _ c d                after   a d e
//!           0 1 2 3 4 5 6                        0 1 2
//!
//!   pos 0,1 unchanged                    pos 0 unchanged
//!   pos 2 → 5, pos 3 → 6                 pos 1,2 → 1 (displaced)
//!   pos 4 (end) → 7 (end)                pos 3 → 1, 4 → 2, 5 (end) → 3
//! ```

use std::fmt;

/// A structural change to the logical sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Splice {
    /// `count` new slots were inserted so the first of them sits at `at`.
    ///
    /// Positions at or after `at` shift forward: a cursor on the element
    /// that used to occupy `at` keeps following that element. Appends are
    /// inserts at the old length, which carries the end cursor along.
    Insert {
        /// Index of the first inserted slot.
        at: usize,
        /// Number of inserted slots.
        count: usize,
    },
    /// The slots `[start, end)` were removed.
    ///
    /// Positions at or after `end` shift back by `end - start`. Positions
    /// inside the range land on `start`, the successor of the removed
    /// range, and are reported as displaced.
    Remove {
        /// First removed index.
        start: usize,
        /// One past the last removed index.
        end: usize,
    },
}

/// Result of rebasing one cursor position through a [`Splice`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rebased {
    /// The new logical position.
    pub position: usize,
    /// Whether the element the cursor referred to was removed.
    pub displaced: bool,
}

impl Splice {
    /// An insertion of `count` slots at `at`.
    pub fn insert(at: usize, count: usize) -> Self {
        Self::Insert { at, count }
    }

    /// A removal of the slots `[start, end)`.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    pub fn remove(start: usize, end: usize) -> Self {
        assert!(start <= end, "inverted removal range {start}..{end}");
        Self::Remove { start, end }
    }

    /// Whether applying this splice can move any cursor.
    pub fn is_noop(&self) -> bool {
        match *self {
            Self::Insert { count, .. } => count == 0,
            Self::Remove { start, end } => start == end,
        }
    }

    /// Net change in sequence length.
    pub fn delta(&self) -> isize {
        match *self {
            Self::Insert { count, .. } => count as isize,
            Self::Remove { start, end } => -((end - start) as isize),
        }
    }

    /// Sequence length after applying this splice to a sequence of
    /// `old_len` elements.
    pub fn apply_len(&self, old_len: usize) -> usize {
        match *self {
            Self::Insert { count, .. } => old_len + count,
            Self::Remove { start, end } => old_len - (end - start),
        }
    }

    /// Map a pre-splice cursor position to its post-splice position.
    pub fn rebase(&self, position: usize) -> Rebased {
        match *self {
            Self::Insert { at, count } => Rebased {
                position: if position >= at {
                    position + count
                } else {
                    position
                },
                displaced: false,
            },
            Self::Remove { start, end } => {
                if position >= end {
                    Rebased {
                        position: position - (end - start),
                        displaced: false,
                    }
                } else if position >= start {
                    Rebased {
                        position: start,
                        displaced: true,
                    }
                } else {
                    Rebased {
                        position,
                        displaced: false,
                    }
                }
            }
        }
    }
}

impl fmt::Display for Splice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert { at, count } => write!(f, "insert {count} at {at}"),
            Self::Remove { start, end } => write!(f, "remove {start}..{end}"),
        }
    }
}
