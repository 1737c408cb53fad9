//! Registry of live cursor positions.
//!
//! [`CursorRegistry`] stores one optional slot per registration. Registering
//! appends; releasing nulls the slot in place so other cursors' indices stay
//! valid, then trims trailing empty slots. Holes in the middle are left
//! alone and skipped by every pass. The registry is expected to stay small
//! (its size tracks nesting depth, not element count), so the first few
//! slots live inline.

use smallvec::SmallVec;
use walkvec_core::{CursorEpoch, Splice};

use crate::config::WalkVecConfig;

/// State of one registered cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CursorSlot {
    /// Epoch assigned at registration.
    pub(crate) epoch: CursorEpoch,
    /// Logical index into the container, `0..=len`.
    pub(crate) position: usize,
    /// Set when the element under the cursor was removed and the cursor
    /// now rests on its successor. Cleared by explicit moves.
    pub(crate) displaced: bool,
}

/// Outcome of one rebase pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RebasePass {
    /// Cursors whose position changed.
    pub(crate) moved: u64,
    /// Cursors whose element was removed.
    pub(crate) displaced: u64,
}

pub(crate) struct CursorRegistry {
    slots: SmallVec<[Option<CursorSlot>; WalkVecConfig::INLINE_CURSORS]>,
    next_epoch: CursorEpoch,
    live: usize,
}

impl CursorRegistry {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SmallVec::with_capacity(capacity),
            next_epoch: CursorEpoch(1),
            live: 0,
        }
    }

    /// Append a slot for a new cursor at `position`.
    pub(crate) fn register(&mut self, position: usize, displaced: bool) -> (usize, CursorEpoch) {
        let epoch = self.next_epoch;
        self.next_epoch = epoch.succ();
        let index = self.slots.len();
        self.slots.push(Some(CursorSlot {
            epoch,
            position,
            displaced,
        }));
        self.live += 1;
        (index, epoch)
    }

    /// Null the slot for `(index, epoch)` and trim trailing holes.
    ///
    /// Returns the released slot, or `None` if no such registration exists.
    pub(crate) fn release(&mut self, index: usize, epoch: CursorEpoch) -> Option<CursorSlot> {
        let entry = self.slots.get_mut(index)?;
        let slot = entry.filter(|slot| slot.epoch == epoch)?;
        *entry = None;
        self.live -= 1;
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
        Some(slot)
    }

    pub(crate) fn get(&self, index: usize, epoch: CursorEpoch) -> Option<&CursorSlot> {
        self.slots
            .get(index)?
            .as_ref()
            .filter(|slot| slot.epoch == epoch)
    }

    pub(crate) fn get_mut(&mut self, index: usize, epoch: CursorEpoch) -> Option<&mut CursorSlot> {
        self.slots
            .get_mut(index)?
            .as_mut()
            .filter(|slot| slot.epoch == epoch)
    }

    /// Number of registered cursors.
    pub(crate) fn live(&self) -> usize {
        self.live
    }

    /// Number of slots including interior holes.
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Apply `splice` to every registered cursor.
    pub(crate) fn rebase(&mut self, splice: &Splice) -> RebasePass {
        let mut pass = RebasePass::default();
        for slot in self.slots.iter_mut().flatten() {
            let rebased = splice.rebase(slot.position);
            if rebased.position != slot.position {
                pass.moved += 1;
            }
            if rebased.displaced {
                pass.displaced += 1;
                slot.displaced = true;
            }
            slot.position = rebased.position;
        }
        pass
    }

    /// Pull every cursor beyond `len` back to `len`, marking it displaced.
    ///
    /// Used when the whole backing store is replaced and positions no
    /// longer describe a splice.
    pub(crate) fn clamp(&mut self, len: usize) -> RebasePass {
        let mut pass = RebasePass::default();
        for slot in self.slots.iter_mut().flatten() {
            if slot.position > len {
                slot.position = len;
                slot.displaced = true;
                pass.moved += 1;
                pass.displaced += 1;
            }
        }
        pass
    }

    /// Panic if any cursor sits outside `0..=len`.
    pub(crate) fn assert_within(&self, len: usize) {
        for slot in self.slots.iter().flatten() {
            assert!(
                slot.position <= len,
                "cursor epoch {} at position {} outside 0..={}",
                slot.epoch,
                slot.position,
                len,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> CursorRegistry {
        CursorRegistry::with_capacity(WalkVecConfig::INLINE_CURSORS)
    }

    #[test]
    fn register_appends_with_fresh_epochs() {
        let mut reg = registry();
        let (i0, e0) = reg.register(0, false);
        let (i1, e1) = reg.register(5, false);
        assert_eq!((i0, i1), (0, 1));
        assert_ne!(e0, e1);
        assert_eq!(reg.live(), 2);
        assert_eq!(reg.get(i1, e1).unwrap().position, 5);
    }

    #[test]
    fn release_leaves_interior_hole() {
        let mut reg = registry();
        let (i0, e0) = reg.register(0, false);
        let (_i1, _e1) = reg.register(1, false);
        let (i2, e2) = reg.register(2, false);

        reg.release(i0, e0).unwrap();
        assert_eq!(reg.live(), 2);
        assert_eq!(reg.slot_count(), 3, "interior hole is not compacted");
        assert_eq!(reg.get(i2, e2).unwrap().position, 2);
    }

    #[test]
    fn release_trims_trailing_holes() {
        let mut reg = registry();
        let (i0, e0) = reg.register(0, false);
        let (i1, e1) = reg.register(1, false);
        let (i2, e2) = reg.register(2, false);

        reg.release(i1, e1).unwrap();
        assert_eq!(reg.slot_count(), 3);
        reg.release(i2, e2).unwrap();
        assert_eq!(reg.slot_count(), 1, "slots 1 and 2 trimmed together");
        reg.release(i0, e0).unwrap();
        assert_eq!(reg.slot_count(), 0);
        assert_eq!(reg.live(), 0);
    }

    #[test]
    fn trimmed_slot_reuse_gets_new_epoch() {
        let mut reg = registry();
        let (i0, e0) = reg.register(0, false);
        reg.release(i0, e0).unwrap();
        let (i1, e1) = reg.register(3, false);
        assert_eq!(i0, i1, "slot index reused after trim");
        assert_ne!(e0, e1);
        assert!(reg.get(i0, e0).is_none(), "old registration is stale");
        assert!(reg.release(i0, e0).is_none());
        assert_eq!(reg.live(), 1);
    }

    #[test]
    fn rebase_skips_holes() {
        let mut reg = registry();
        let (i0, e0) = reg.register(1, false);
        let (i1, e1) = reg.register(4, false);
        let (i2, e2) = reg.register(6, false);
        reg.release(i1, e1).unwrap();

        let pass = reg.rebase(&Splice::insert(2, 3));
        assert_eq!(pass.moved, 1);
        assert_eq!(reg.get(i0, e0).unwrap().position, 1);
        assert_eq!(reg.get(i2, e2).unwrap().position, 9);
    }

    #[test]
    fn rebase_marks_displaced() {
        let mut reg = registry();
        let (i0, e0) = reg.register(2, false);
        let pass = reg.rebase(&Splice::remove(1, 4));
        assert_eq!(pass.displaced, 1);
        let slot = reg.get(i0, e0).unwrap();
        assert_eq!(slot.position, 1);
        assert!(slot.displaced);
    }

    #[test]
    fn displaced_flag_survives_later_insert() {
        let mut reg = registry();
        let (i0, e0) = reg.register(2, false);
        reg.rebase(&Splice::remove(2, 3));
        reg.rebase(&Splice::insert(0, 1));
        let slot = reg.get(i0, e0).unwrap();
        assert_eq!(slot.position, 3);
        assert!(slot.displaced);
    }

    #[test]
    fn clamp_pulls_back_tail_cursors() {
        let mut reg = registry();
        let (i0, e0) = reg.register(1, false);
        let (i1, e1) = reg.register(7, false);
        let pass = reg.clamp(3);
        assert_eq!(pass.moved, 1);
        assert_eq!(reg.get(i0, e0).unwrap().position, 1);
        assert_eq!(reg.get(i1, e1).unwrap().position, 3);
        assert!(reg.get(i1, e1).unwrap().displaced);
    }

    #[test]
    fn spills_past_inline_capacity() {
        let mut reg = registry();
        let handles: Vec<_> = (0..WalkVecConfig::INLINE_CURSORS * 3)
            .map(|p| reg.register(p, false))
            .collect();
        assert_eq!(reg.live(), handles.len());
        for (p, &(i, e)) in handles.iter().enumerate() {
            assert_eq!(reg.get(i, e).unwrap().position, p);
        }
    }

    #[test]
    #[should_panic(expected = "outside 0..=2")]
    fn assert_within_detects_escape() {
        let mut reg = registry();
        reg.register(5, false);
        reg.assert_within(2);
    }
}
