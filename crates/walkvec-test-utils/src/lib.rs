//! Reference model and fixtures for walkvec tests.
//!
//! [`Harness`] drives a [`WalkVec`] and a plain identity-tracking model side
//! by side. The model never does index arithmetic: each cursor remembers the
//! id of the element it refers to (or that it is the end cursor), so
//! [`Harness::check`] is an independent oracle for the container's rebase
//! logic.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;
use walkvec::{Cursor, WalkVec};

/// Install `env_logger` for a test binary. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One step of a randomized workload.
///
/// Index-like fields are raw and reduced modulo the current length (or
/// cursor count) when applied, so every generated sequence is valid.
#[derive(Clone, Debug)]
pub enum Op {
    Push,
    Insert { at: usize },
    InsertN { at: usize, count: usize },
    Remove { at: usize },
    RemoveRange { start: usize, span: usize },
    Pop,
    Truncate { len: usize },
    Reserve { additional: usize },
    ShrinkToFit,
    AddCursor { at: usize },
    ReleaseCursor { which: usize },
    Advance { which: usize },
    EraseAt { which: usize },
}

/// Strategy for a single [`Op`], weighted towards growth so sequences do
/// not stay empty.
pub fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Push),
        3 => any::<usize>().prop_map(|at| Op::Insert { at }),
        1 => (any::<usize>(), 0usize..6).prop_map(|(at, count)| Op::InsertN { at, count }),
        2 => any::<usize>().prop_map(|at| Op::Remove { at }),
        1 => (any::<usize>(), any::<usize>())
            .prop_map(|(start, span)| Op::RemoveRange { start, span }),
        1 => Just(Op::Pop),
        1 => any::<usize>().prop_map(|len| Op::Truncate { len }),
        1 => (0usize..64).prop_map(|additional| Op::Reserve { additional }),
        1 => Just(Op::ShrinkToFit),
        3 => any::<usize>().prop_map(|at| Op::AddCursor { at }),
        1 => any::<usize>().prop_map(|which| Op::ReleaseCursor { which }),
        2 => any::<usize>().prop_map(|which| Op::Advance { which }),
        1 => any::<usize>().prop_map(|which| Op::EraseAt { which }),
    ]
}

/// Strategy for a workload of up to `max_len` ops.
pub fn arb_ops(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(arb_op(), 0..max_len)
}

/// What a model cursor refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    Element(u64),
    End,
}

/// A [`WalkVec<u64>`] of unique ids paired with an identity model.
pub struct Harness {
    vec: WalkVec<u64>,
    model: Vec<u64>,
    cursors: Vec<(Cursor, Target)>,
    next_id: u64,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            vec: WalkVec::new(),
            model: Vec::new(),
            cursors: Vec::new(),
            next_id: 0,
        }
    }

    pub fn vec(&self) -> &WalkVec<u64> {
        &self.vec
    }

    pub fn cursor_count(&self) -> usize {
        self.cursors.len()
    }

    fn fresh(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn target_at(&self, index: usize) -> Target {
        self.model
            .get(index)
            .map_or(Target::End, |&id| Target::Element(id))
    }

    /// Retarget model cursors whose element lies in `[start, end)` to the
    /// element after the range. Must run before the model is mutated.
    fn retarget_removed(&mut self, start: usize, end: usize) {
        let successor = self.target_at(end);
        let removed = &self.model[start..end];
        for (_, target) in &mut self.cursors {
            if let Target::Element(id) = *target {
                if removed.contains(&id) {
                    *target = successor;
                }
            }
        }
    }

    fn model_remove(&mut self, start: usize, end: usize) {
        self.retarget_removed(start, end);
        self.model.drain(start..end);
    }

    /// Apply `op` to both the container and the model.
    pub fn apply(&mut self, op: &Op) {
        let len = self.model.len();
        match *op {
            Op::Push => {
                let id = self.fresh();
                self.vec.push(id);
                self.model.push(id);
            }
            Op::Insert { at } => {
                let at = at % (len + 1);
                let id = self.fresh();
                self.vec.insert(at, id);
                self.model.insert(at, id);
            }
            Op::InsertN { at, count } => {
                let at = at % (len + 1);
                let ids: Vec<u64> = (0..count).map(|_| self.fresh()).collect();
                let inserted = self.vec.insert_iter(at, ids.iter().copied());
                assert_eq!(inserted, count);
                self.model.splice(at..at, ids);
            }
            Op::Remove { at } => {
                if len == 0 {
                    return;
                }
                let at = at % len;
                let removed = self.vec.remove(at);
                assert_eq!(removed, self.model[at]);
                self.model_remove(at, at + 1);
            }
            Op::RemoveRange { start, span } => {
                let start = start % (len + 1);
                let end = start + span % (len - start + 1);
                assert_eq!(self.vec.remove_range(start..end), end - start);
                self.model_remove(start, end);
            }
            Op::Pop => {
                let popped = self.vec.pop();
                assert_eq!(popped, self.model.last().copied());
                if len > 0 {
                    self.model_remove(len - 1, len);
                }
            }
            Op::Truncate { len: keep } => {
                let keep = keep % (len + 1);
                self.vec.truncate(keep);
                self.model_remove(keep, len);
            }
            Op::Reserve { additional } => self.vec.reserve(additional),
            Op::ShrinkToFit => self.vec.shrink_to_fit(),
            Op::AddCursor { at } => {
                let at = at % (len + 1);
                let cursor = self.vec.cursor_at(at);
                let target = self.target_at(at);
                self.cursors.push((cursor, target));
            }
            Op::ReleaseCursor { which } => {
                if self.cursors.is_empty() {
                    return;
                }
                let (cursor, _) = self.cursors.remove(which % self.cursors.len());
                self.vec.release(cursor);
            }
            Op::Advance { which } => {
                if self.cursors.is_empty() {
                    return;
                }
                let which = which % self.cursors.len();
                let Target::Element(id) = self.cursors[which].1 else {
                    return;
                };
                self.vec.advance(&self.cursors[which].0);
                let index = self.index_of(id);
                self.cursors[which].1 = self.target_at(index + 1);
            }
            Op::EraseAt { which } => {
                if self.cursors.is_empty() {
                    return;
                }
                let which = which % self.cursors.len();
                let Target::Element(id) = self.cursors[which].1 else {
                    return;
                };
                let index = self.index_of(id);
                let next = self.vec.erase(&self.cursors[which].0);
                self.model_remove(index, index + 1);
                let target = self.target_at(index);
                self.cursors.push((next, target));
            }
        }
    }

    fn index_of(&self, id: u64) -> usize {
        match self.model.iter().position(|&x| x == id) {
            Some(index) => index,
            None => panic!("model cursor targets missing element {id}"),
        }
    }

    /// Compare container and model. Returns a description of the first
    /// mismatch.
    pub fn check(&self) -> Result<(), String> {
        if self.vec.as_slice() != self.model.as_slice() {
            return Err(format!(
                "contents diverged: vec {:?}, model {:?}",
                self.vec.as_slice(),
                self.model
            ));
        }
        if self.vec.live_cursors() != self.cursors.len() {
            return Err(format!(
                "live cursors {} but model holds {}",
                self.vec.live_cursors(),
                self.cursors.len()
            ));
        }
        for (cursor, target) in &self.cursors {
            let expected = match *target {
                Target::Element(id) => self.index_of(id),
                Target::End => self.model.len(),
            };
            let actual = self.vec.position(cursor);
            if actual != expected {
                return Err(format!(
                    "{cursor} at {actual}, expected {expected} ({target:?})"
                ));
            }
        }
        Ok(())
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        for (cursor, _) in self.cursors.drain(..) {
            self.vec.release(cursor);
        }
    }
}

/// Element that counts its drops into a shared tally.
///
/// Use to check that removal paths drop each element exactly once.
#[derive(Debug)]
pub struct DropTally {
    pub value: u32,
    drops: Rc<Cell<usize>>,
}

impl DropTally {
    /// A fresh drop counter to pass to [`DropTally::new`].
    pub fn counter() -> Rc<Cell<usize>> {
        Rc::new(Cell::new(0))
    }

    pub fn new(value: u32, drops: &Rc<Cell<usize>>) -> Self {
        Self {
            value,
            drops: Rc::clone(drops),
        }
    }
}

impl Clone for DropTally {
    fn clone(&self) -> Self {
        Self::new(self.value, &self.drops)
    }
}

impl Drop for DropTally {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}
