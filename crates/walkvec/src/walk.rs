//! Guarded forward traversal that tolerates mutation.
//!
//! A [`Walk`] owns one registered cursor and a mutable borrow of its
//! container. Each call to [`Walk::next`] yields the next element; between
//! calls the walk can remove the current element or insert around it, and
//! any other mutation made through [`Walk::vec`] rebases the walk's cursor
//! like every other.
//!
//! The walk never skips or repeats an element that was present when it
//! reached it:
//!
//! - after the current element is removed the cursor rests on the
//!   successor, which the next step yields without advancing,
//! - elements inserted before the cursor are behind it and not visited,
//! - an element inserted with [`Walk::insert_after`] is yielded next.
//!
//! `Walk` is a lending iterator: the yielded reference borrows the walk, so
//! it cannot implement [`Iterator`]. Drive it with `while let`.

use crate::cursor::Cursor;
use crate::vec::WalkVec;

/// Mutation-tolerant traversal over a [`WalkVec`].
///
/// ```
/// use walkvec::WalkVec;
///
/// let mut v: WalkVec<i32> = (1..=6).collect();
/// let mut walk = v.walk();
/// while let Some(x) = walk.next() {
///     if *x % 2 == 0 {
///         walk.remove_current();
///     } else {
///         *x *= 10;
///     }
/// }
/// drop(walk);
/// assert_eq!(v.as_slice(), &[10, 30, 50]);
/// ```
pub struct Walk<'a, T> {
    vec: &'a mut WalkVec<T>,
    cursor: Cursor,
    started: bool,
}

impl<'a, T> Walk<'a, T> {
    pub(crate) fn new(vec: &'a mut WalkVec<T>, start: usize) -> Self {
        let cursor = vec.cursor_at(start);
        Self {
            vec,
            cursor,
            started: false,
        }
    }

    /// Step to the next element and return it, or `None` once the walk has
    /// passed the end.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&mut T> {
        let len = self.vec.len();
        let started = self.started;
        let slot = self.vec.slot_mut(&self.cursor);
        if started && !slot.displaced {
            slot.position = (slot.position + 1).min(len);
        }
        slot.displaced = false;
        let pos = slot.position;
        self.started = true;
        self.vec.get_mut(pos)
    }

    /// Position of the walk's cursor.
    pub fn position(&self) -> usize {
        self.vec.position(&self.cursor)
    }

    /// Whether the element last yielded has been removed.
    pub fn is_displaced(&self) -> bool {
        self.vec.is_displaced(&self.cursor)
    }

    /// The element last yielded by [`next`](Self::next), unless it has been
    /// removed or the walk is exhausted.
    pub fn current(&self) -> Option<&T> {
        self.visited().and_then(|pos| self.vec.get(pos))
    }

    /// Mutable form of [`current`](Self::current).
    pub fn current_mut(&mut self) -> Option<&mut T> {
        let pos = self.visited()?;
        self.vec.get_mut(pos)
    }

    /// Remove the element last yielded and return it.
    ///
    /// Returns `None` if there is no current element (see
    /// [`current`](Self::current)). The next step yields the successor.
    pub fn remove_current(&mut self) -> Option<T> {
        let pos = self.visited()?;
        Some(self.vec.remove(pos))
    }

    /// Insert `value` before the cursor. It is not visited by this walk.
    pub fn insert_before(&mut self, value: T) {
        let pos = self.position();
        self.vec.insert(pos, value);
    }

    /// Insert `value` after the element last yielded, so the next step
    /// yields it.
    ///
    /// If the current element was removed, or nothing has been yielded yet,
    /// the value goes in front of the element the cursor rests on.
    pub fn insert_after(&mut self, value: T) {
        match self.visited() {
            Some(pos) => self.vec.insert(pos + 1, value),
            None => {
                let pos = self.position();
                self.vec.insert(pos, value);
                let slot = self.vec.slot_mut(&self.cursor);
                slot.position = pos;
                slot.displaced = true;
            }
        }
    }

    /// The container, for mutations the walk has no shorthand for.
    ///
    /// The walk's cursor is rebased like any other.
    pub fn vec(&mut self) -> &mut WalkVec<T> {
        &mut *self.vec
    }

    /// Shared view of the container.
    pub fn vec_ref(&self) -> &WalkVec<T> {
        &*self.vec
    }

    /// The walk's cursor, for use with the container's cursor methods.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Position of the element last yielded, if it is still present.
    fn visited(&self) -> Option<usize> {
        if !self.started || self.vec.is_displaced(&self.cursor) {
            return None;
        }
        let pos = self.vec.position(&self.cursor);
        (pos < self.vec.len()).then_some(pos)
    }
}

impl<T> Drop for Walk<'_, T> {
    fn drop(&mut self) {
        if let Err(e) = self.vec.deregister(&self.cursor) {
            log::warn!("walk cursor {} already gone: {e}", self.cursor);
        }
    }
}
