//! Cursor handles.
//!
//! A [`Cursor`] is a weak, non-owning reference into a [`WalkVec`]. It does
//! not hold the position itself; the container keeps the position in its
//! cursor registry so it can rebase every live cursor when the sequence is
//! spliced. The handle only encodes which registration to look up.
//!
//! [`WalkVec`]: crate::WalkVec

use std::fmt;

use walkvec_core::{CursorEpoch, VecInstanceId};

/// Handle to a registered cursor position.
///
/// Created by [`WalkVec::begin`](crate::WalkVec::begin),
/// [`WalkVec::end`](crate::WalkVec::end),
/// [`WalkVec::cursor_at`](crate::WalkVec::cursor_at) and the cursor-positioned
/// insert and erase methods. A cursor stays registered, and is rebased on
/// every mutation, until it is passed to
/// [`WalkVec::release`](crate::WalkVec::release).
///
/// Cursors are deliberately not `Clone`: two handles to one registration
/// would make release ambiguous. Use
/// [`WalkVec::duplicate`](crate::WalkVec::duplicate) to register a second
/// cursor at the same position.
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "a cursor stays registered until passed to WalkVec::release"]
pub struct Cursor {
    /// Container that issued this cursor.
    pub(crate) owner: VecInstanceId,
    /// Index into the owner's registry.
    pub(crate) index: usize,
    /// Registration epoch, distinguishing reuse of a trimmed slot.
    pub(crate) epoch: CursorEpoch,
}

impl Cursor {
    pub(crate) fn new(owner: VecInstanceId, index: usize, epoch: CursorEpoch) -> Self {
        Self {
            owner,
            index,
            epoch,
        }
    }

    /// The container this cursor belongs to.
    pub fn owner(&self) -> VecInstanceId {
        self.owner
    }

    /// The registry slot this cursor occupies.
    pub fn slot(&self) -> usize {
        self.index
    }

    /// The registration epoch.
    pub fn epoch(&self) -> CursorEpoch {
        self.epoch
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cursor(vec={}, slot={}, epoch={})",
            self.owner, self.index, self.epoch
        )
    }
}
