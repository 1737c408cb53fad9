//! The iteration-safe growable array.
//!
//! [`WalkVec`] wraps a `Vec<T>` and a registry of live cursors. Every
//! mutating method follows the same three steps:
//!
//! 1. record the backing store's address and capacity,
//! 2. perform the `Vec` operation,
//! 3. describe the logical change as a [`Splice`] and rebase every live
//!    cursor through it, counting a reallocation if the store moved.
//!
//! Because cursor positions are logical indices, reallocation alone never
//! moves a cursor; it is tracked only for statistics and logging.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Bound, Index, IndexMut, RangeBounds};

use walkvec_core::{Splice, VecInstanceId, CHECKED};

use crate::config::WalkVecConfig;
use crate::cursor::Cursor;
use crate::error::WalkError;
use crate::registry::{CursorRegistry, CursorSlot};
use crate::stats::WalkStats;
use crate::walk::Walk;

/// Address and capacity of the backing store before a mutation.
struct StoreMark<T> {
    ptr: *const T,
    capacity: usize,
    len: usize,
}

/// A growable array whose cursors survive insertion, removal and
/// reallocation.
///
/// Cursors are registered with the container and rebased on every
/// structural change so they keep referring to the same logical element:
///
/// - inserting at or before a cursor shifts it forward,
/// - removing elements before a cursor shifts it back,
/// - removing the element under a cursor leaves it on the successor.
///
/// ```
/// use walkvec::WalkVec;
///
/// let mut v: WalkVec<i32> = vec![10, 20, 30, 40, 50].into();
/// let it = v.cursor_at(2);
/// v.remove(0);
/// assert_eq!(v.current(&it), &30);
/// v.release(it);
/// ```
///
/// All access is single-threaded; "concurrent" here means mutation
/// interleaved with iteration on the same thread.
pub struct WalkVec<T> {
    data: Vec<T>,
    cursors: CursorRegistry,
    id: VecInstanceId,
    cursor_warn_threshold: usize,
    /// Set once the live cursor count crosses the threshold, cleared when it
    /// drops back, so each crossing logs once.
    over_threshold: bool,
    stats: WalkStats,
}

impl<T> WalkVec<T> {
    /// Create an empty container with the default configuration.
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), &WalkVecConfig::default())
    }

    /// Create an empty container with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_parts(Vec::with_capacity(capacity), &WalkVecConfig::default())
    }

    /// Create an empty container from a validated configuration.
    pub fn with_config(config: WalkVecConfig) -> Result<Self, WalkError> {
        config.validate()?;
        Ok(Self::from_parts(
            Vec::with_capacity(config.initial_capacity),
            &config,
        ))
    }

    fn from_parts(data: Vec<T>, config: &WalkVecConfig) -> Self {
        Self {
            data,
            cursors: CursorRegistry::with_capacity(config.cursor_capacity),
            id: VecInstanceId::next(),
            cursor_warn_threshold: config.cursor_warn_threshold,
            over_threshold: false,
            stats: WalkStats::default(),
        }
    }

    /// Unique id of this container; matches [`Cursor::owner`] for the
    /// cursors it issues.
    pub fn id(&self) -> VecInstanceId {
        self.id
    }

    // ── Element access ────────────────────────────────────────────

    /// Element at `index`, or [`WalkError::OutOfRange`].
    pub fn at(&self, index: usize) -> Result<&T, WalkError> {
        let len = self.data.len();
        self.data
            .get(index)
            .ok_or(WalkError::OutOfRange { index, len })
    }

    /// Mutable element at `index`, or [`WalkError::OutOfRange`].
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, WalkError> {
        let len = self.data.len();
        self.data
            .get_mut(index)
            .ok_or(WalkError::OutOfRange { index, len })
    }

    /// Element at `index`, if in bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    /// Mutable element at `index`, if in bounds.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index)
    }

    /// First element.
    pub fn front(&self) -> Option<&T> {
        self.data.first()
    }

    /// Mutable first element.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.data.first_mut()
    }

    /// Last element.
    pub fn back(&self) -> Option<&T> {
        self.data.last()
    }

    /// Mutable last element.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.data.last_mut()
    }

    /// The backing store as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The backing store as a mutable slice. Length cannot change through
    /// it, so no cursor needs rebasing.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Address of the backing store. Changes on reallocation.
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    /// Iterate over the elements. Holds a shared borrow, so the
    /// container cannot change underneath it.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Iterate mutably over the elements.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    // ── Capacity ──────────────────────────────────────────────────

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the container has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Elements the backing store can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Largest element count the backing store could address.
    pub fn max_size(&self) -> usize {
        match std::mem::size_of::<T>() {
            0 => usize::MAX,
            size => isize::MAX as usize / size,
        }
    }

    /// Reserve room for at least `additional` more elements.
    ///
    /// May reallocate; cursors keep their logical positions.
    pub fn reserve(&mut self, additional: usize) {
        let mark = self.mark();
        self.data.reserve(additional);
        self.finish(mark, None);
    }

    /// Reserve room for exactly `additional` more elements.
    pub fn reserve_exact(&mut self, additional: usize) {
        let mark = self.mark();
        self.data.reserve_exact(additional);
        self.finish(mark, None);
    }

    /// Release spare capacity.
    pub fn shrink_to_fit(&mut self) {
        let mark = self.mark();
        self.data.shrink_to_fit();
        self.finish(mark, None);
    }

    // ── Cursors ───────────────────────────────────────────────────

    /// Register a cursor at the first element.
    pub fn begin(&mut self) -> Cursor {
        self.register(0, false)
    }

    /// Register a cursor one past the last element.
    ///
    /// The end cursor follows appends: after a push it is still the end.
    pub fn end(&mut self) -> Cursor {
        let len = self.data.len();
        self.register(len, false)
    }

    /// Register a cursor at `index` (`index == len` is the end position).
    pub fn cursor_at(&mut self, index: usize) -> Cursor {
        if CHECKED {
            assert!(
                index <= self.data.len(),
                "cursor position {index} outside 0..={}",
                self.data.len()
            );
        }
        self.register(index, false)
    }

    /// Register a second cursor at the same position as `cursor`.
    pub fn duplicate(&mut self, cursor: &Cursor) -> Cursor {
        let slot = *self.slot(cursor);
        self.register(slot.position, slot.displaced)
    }

    /// Move `dst` to the position of `src`.
    pub fn assign(&mut self, dst: &Cursor, src: &Cursor) {
        let slot = *self.slot(src);
        *self.slot_mut(dst) = CursorSlot {
            epoch: dst.epoch,
            ..slot
        };
    }

    /// Deregister `cursor`.
    ///
    /// # Panics
    ///
    /// Panics if the cursor belongs to another container or was already
    /// invalidated.
    pub fn release(&mut self, cursor: Cursor) {
        if let Err(e) = self.try_release(cursor) {
            panic!("{e}");
        }
    }

    /// Deregister `cursor`, reporting foreign or stale handles.
    pub fn try_release(&mut self, cursor: Cursor) -> Result<(), WalkError> {
        self.deregister(&cursor)
    }

    pub(crate) fn deregister(&mut self, cursor: &Cursor) -> Result<(), WalkError> {
        self.check_owner(cursor)?;
        self.cursors
            .release(cursor.index, cursor.epoch)
            .ok_or(WalkError::StaleCursor {
                index: cursor.index,
                epoch: cursor.epoch,
            })?;
        if self.over_threshold && self.cursors.live() <= self.cursor_warn_threshold {
            self.over_threshold = false;
        }
        Ok(())
    }

    /// Number of registered cursors.
    pub fn live_cursors(&self) -> usize {
        self.cursors.live()
    }

    /// Registry length including interior holes left by released cursors.
    pub fn cursor_slots(&self) -> usize {
        self.cursors.slot_count()
    }

    /// Current position of `cursor`, or an error for foreign or stale
    /// handles.
    pub fn try_position(&self, cursor: &Cursor) -> Result<usize, WalkError> {
        self.lookup(cursor).map(|slot| slot.position)
    }

    /// Current logical position of `cursor`.
    ///
    /// # Panics
    ///
    /// Panics if the cursor belongs to another container or was released.
    /// Every cursor method below panics under the same conditions.
    pub fn position(&self, cursor: &Cursor) -> usize {
        self.slot(cursor).position
    }

    /// Whether `cursor` is at or past the last element.
    pub fn is_end(&self, cursor: &Cursor) -> bool {
        self.position(cursor) >= self.data.len()
    }

    /// Whether the element `cursor` referred to has been removed, leaving
    /// the cursor on its successor.
    pub fn is_displaced(&self, cursor: &Cursor) -> bool {
        self.slot(cursor).displaced
    }

    /// Element under `cursor`, or `None` at the end position.
    pub fn get_at(&self, cursor: &Cursor) -> Option<&T> {
        self.data.get(self.position(cursor))
    }

    /// Mutable element under `cursor`, or `None` at the end position.
    pub fn get_at_mut(&mut self, cursor: &Cursor) -> Option<&mut T> {
        let pos = self.position(cursor);
        self.data.get_mut(pos)
    }

    /// Element under `cursor`.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end position.
    pub fn current(&self, cursor: &Cursor) -> &T {
        let pos = self.position(cursor);
        self.check_deref(pos);
        &self.data[pos]
    }

    /// Mutable element under `cursor`.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end position.
    pub fn current_mut(&mut self, cursor: &Cursor) -> &mut T {
        let pos = self.position(cursor);
        self.check_deref(pos);
        &mut self.data[pos]
    }

    /// Element `offset` slots away from `cursor`, if in bounds.
    pub fn peek(&self, cursor: &Cursor, offset: isize) -> Option<&T> {
        self.position(cursor)
            .checked_add_signed(offset)
            .and_then(|i| self.data.get(i))
    }

    /// Move `cursor` one element forward.
    pub fn advance(&mut self, cursor: &Cursor) {
        let len = self.data.len();
        let slot = self.slot_mut(cursor);
        if CHECKED {
            assert!(
                slot.position < len,
                "advance past end (position {}, len {len})",
                slot.position
            );
        }
        slot.position = (slot.position + 1).min(len);
        slot.displaced = false;
    }

    /// Move `cursor` one element back.
    pub fn retreat(&mut self, cursor: &Cursor) {
        let slot = self.slot_mut(cursor);
        if CHECKED {
            assert!(slot.position > 0, "retreat before begin");
        }
        slot.position = slot.position.saturating_sub(1);
        slot.displaced = false;
    }

    /// Move `cursor` by `delta` elements. The result must stay within
    /// `0..=len`.
    pub fn seek(&mut self, cursor: &Cursor, delta: isize) {
        let len = self.data.len();
        let slot = self.slot_mut(cursor);
        if CHECKED {
            let target = slot.position.checked_add_signed(delta);
            assert!(
                target.is_some_and(|t| t <= len),
                "seek by {delta} from {} leaves 0..={len}",
                slot.position
            );
        }
        slot.position = slot.position.saturating_add_signed(delta).min(len);
        slot.displaced = false;
    }

    /// Signed distance `a - b` between two cursors.
    pub fn distance(&self, a: &Cursor, b: &Cursor) -> isize {
        self.position(a) as isize - self.position(b) as isize
    }

    /// Order two cursors by position.
    pub fn cursor_cmp(&self, a: &Cursor, b: &Cursor) -> Ordering {
        self.position(a).cmp(&self.position(b))
    }

    /// Start a walk from the first element. See [`Walk`].
    pub fn walk(&mut self) -> Walk<'_, T> {
        Walk::new(self, 0)
    }

    /// Start a walk from `index`.
    pub fn walk_from(&mut self, index: usize) -> Walk<'_, T> {
        Walk::new(self, index)
    }

    /// Keep only the elements for which `keep` returns true, visiting each
    /// once in order.
    pub fn retain_walk<F>(&mut self, mut keep: F)
    where
        F: FnMut(&mut T) -> bool,
    {
        let mut walk = self.walk();
        while let Some(item) = walk.next() {
            if !keep(item) {
                walk.remove_current();
            }
        }
    }

    // ── Insertion ─────────────────────────────────────────────────

    /// Append `value`.
    pub fn push(&mut self, value: T) {
        let at = self.data.len();
        let mark = self.mark();
        self.data.push(value);
        self.finish(mark, Some(Splice::insert(at, 1)));
    }

    /// Append the value built by `make` and return it.
    pub fn emplace_back<F>(&mut self, make: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        self.push(make());
        let last = self.data.len() - 1;
        &mut self.data[last]
    }

    /// Insert `value` at `index`, shifting later elements and cursors.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) {
        let mark = self.mark();
        self.data.insert(index, value);
        self.finish(mark, Some(Splice::insert(index, 1)));
    }

    /// Insert every item of `items` starting at `index`. Returns the number
    /// of items inserted.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_iter<I>(&mut self, index: usize, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let before = self.data.len();
        let mark = self.mark();
        drop(self.data.splice(index..index, items));
        let count = self.data.len() - before;
        self.finish(mark, Some(Splice::insert(index, count)));
        count
    }

    /// Insert `value` before `cursor` and return a cursor to it.
    ///
    /// `cursor` itself shifts forward and keeps referring to its element.
    pub fn insert_at(&mut self, cursor: &Cursor, value: T) -> Cursor {
        let index = self.position(cursor);
        self.insert(index, value);
        self.register(index, false)
    }

    /// Insert the value built by `make` before `cursor`.
    pub fn emplace_at<F>(&mut self, cursor: &Cursor, make: F) -> Cursor
    where
        F: FnOnce() -> T,
    {
        self.insert_at(cursor, make())
    }

    /// Insert `items` before `cursor` and return a cursor to the first of
    /// them (the end position if `items` was empty and `cursor` was at the
    /// end).
    pub fn insert_iter_at<I>(&mut self, cursor: &Cursor, items: I) -> Cursor
    where
        I: IntoIterator<Item = T>,
    {
        let index = self.position(cursor);
        self.insert_iter(index, items);
        self.register(index, false)
    }

    // ── Removal ───────────────────────────────────────────────────

    /// Remove and return the last element, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        let len = self.data.len();
        let mark = self.mark();
        let value = self.data.pop()?;
        self.finish(mark, Some(Splice::remove(len - 1, len)));
        Some(value)
    }

    /// Remove and return the last element.
    ///
    /// # Panics
    ///
    /// Panics if the container is empty.
    pub fn pop_back(&mut self) -> T {
        match self.pop() {
            Some(value) => value,
            None => panic!("pop_back on empty WalkVec"),
        }
    }

    /// Remove and return the element at `index`. Cursors on it move to its
    /// successor.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        let mark = self.mark();
        let value = self.data.remove(index);
        self.finish(mark, Some(Splice::remove(index, index + 1)));
        value
    }

    /// Remove the elements in `range`. Returns the number removed.
    ///
    /// # Panics
    ///
    /// Panics if the range is inverted or extends past the end.
    pub fn remove_range<R>(&mut self, range: R) -> usize
    where
        R: RangeBounds<usize>,
    {
        let (start, end) = resolve_range(&range, self.data.len());
        let mark = self.mark();
        drop(self.data.drain(start..end));
        self.finish(mark, Some(Splice::remove(start, end)));
        end - start
    }

    /// Remove the element under `cursor` and return a cursor to its
    /// successor.
    pub fn erase(&mut self, cursor: &Cursor) -> Cursor {
        let index = self.position(cursor);
        self.check_deref(index);
        self.remove(index);
        self.register(index, false)
    }

    /// Remove `[first, last)` and return a cursor to the element after the
    /// removed range.
    ///
    /// # Panics
    ///
    /// Panics if `last` is before `first`.
    pub fn erase_range(&mut self, first: &Cursor, last: &Cursor) -> Cursor {
        let start = self.position(first);
        let end = self.position(last);
        assert!(
            start <= end,
            "erase_range with last ({end}) before first ({start})"
        );
        self.remove_range(start..end);
        self.register(start, false)
    }

    /// Shorten to `len` elements. No effect if already shorter.
    pub fn truncate(&mut self, len: usize) {
        let old = self.data.len();
        if len >= old {
            return;
        }
        let mark = self.mark();
        self.data.truncate(len);
        self.finish(mark, Some(Splice::remove(len, old)));
    }

    /// Grow or shrink to `len` elements using `make` for new ones.
    pub fn resize_with<F>(&mut self, len: usize, make: F)
    where
        F: FnMut() -> T,
    {
        let old = self.data.len();
        match len.cmp(&old) {
            Ordering::Equal => {}
            Ordering::Less => self.truncate(len),
            Ordering::Greater => {
                let mark = self.mark();
                self.data.resize_with(len, make);
                self.finish(mark, Some(Splice::insert(old, len - old)));
            }
        }
    }

    /// Grow or shrink to `len` elements, default-constructing new ones.
    pub fn resize_default(&mut self, len: usize)
    where
        T: Default,
    {
        self.resize_with(len, T::default);
    }

    /// Remove every element.
    ///
    /// Clearing while cursors are registered is a usage error and asserts
    /// in checked builds. Unchecked builds move any remaining cursors to
    /// position 0.
    pub fn clear(&mut self) {
        if CHECKED {
            assert_eq!(
                self.cursors.live(),
                0,
                "clear() with {} live cursor(s)",
                self.cursors.live()
            );
        }
        let len = self.data.len();
        let mark = self.mark();
        self.data.clear();
        self.finish(mark, Some(Splice::remove(0, len)));
    }

    /// [`clear`](Self::clear), refusing with [`WalkError::LiveCursors`]
    /// instead of asserting.
    pub fn try_clear(&mut self) -> Result<(), WalkError> {
        self.require_no_cursors()?;
        self.clear();
        Ok(())
    }

    /// Exchange the backing store with `other`.
    ///
    /// Requires that no cursors are registered; asserts in checked builds.
    pub fn swap_storage(&mut self, other: &mut Vec<T>) {
        if CHECKED {
            assert_eq!(
                self.cursors.live(),
                0,
                "swap_storage() with {} live cursor(s)",
                self.cursors.live()
            );
        }
        std::mem::swap(&mut self.data, other);
        self.replaced();
    }

    /// [`swap_storage`](Self::swap_storage), refusing with
    /// [`WalkError::LiveCursors`] instead of asserting.
    pub fn try_swap_storage(&mut self, other: &mut Vec<T>) -> Result<(), WalkError> {
        self.require_no_cursors()?;
        self.swap_storage(other);
        Ok(())
    }

    /// Exchange elements with another container. Registries, ids and
    /// statistics stay with their containers.
    ///
    /// Requires that neither container has registered cursors; asserts in
    /// checked builds.
    pub fn swap_with(&mut self, other: &mut WalkVec<T>) {
        if CHECKED {
            let live = self.cursors.live() + other.cursors.live();
            assert_eq!(live, 0, "swap_with() with {live} live cursor(s)");
        }
        std::mem::swap(&mut self.data, &mut other.data);
        self.replaced();
        other.replaced();
    }

    /// [`swap_with`](Self::swap_with), refusing with
    /// [`WalkError::LiveCursors`] if either container has cursors.
    pub fn try_swap_with(&mut self, other: &mut WalkVec<T>) -> Result<(), WalkError> {
        self.require_no_cursors()?;
        other.require_no_cursors()?;
        self.swap_with(other);
        Ok(())
    }

    /// Consume the container and return the backing store.
    pub fn into_vec(mut self) -> Vec<T> {
        std::mem::take(&mut self.data)
    }

    // ── Statistics ────────────────────────────────────────────────

    /// Counters accumulated since construction or the last reset.
    pub fn stats(&self) -> &WalkStats {
        &self.stats
    }

    /// Zero every counter.
    pub fn reset_stats(&mut self) {
        self.stats = WalkStats::default();
    }

    // ── Internals ─────────────────────────────────────────────────

    fn register(&mut self, position: usize, displaced: bool) -> Cursor {
        let (index, epoch) = self.cursors.register(position, displaced);
        let live = self.cursors.live();
        self.stats.peak_live_cursors = self.stats.peak_live_cursors.max(live);
        if live > self.cursor_warn_threshold && !self.over_threshold {
            self.over_threshold = true;
            log::warn!(
                "WalkVec {}: {live} live cursors exceeds threshold {}; \
                 every mutation rebases all of them",
                self.id,
                self.cursor_warn_threshold,
            );
        }
        Cursor::new(self.id, index, epoch)
    }

    fn check_owner(&self, cursor: &Cursor) -> Result<(), WalkError> {
        if cursor.owner != self.id {
            return Err(WalkError::ForeignCursor {
                expected: self.id,
                found: cursor.owner,
            });
        }
        Ok(())
    }

    fn lookup(&self, cursor: &Cursor) -> Result<&CursorSlot, WalkError> {
        self.check_owner(cursor)?;
        self.cursors
            .get(cursor.index, cursor.epoch)
            .ok_or(WalkError::StaleCursor {
                index: cursor.index,
                epoch: cursor.epoch,
            })
    }

    fn slot(&self, cursor: &Cursor) -> &CursorSlot {
        match self.lookup(cursor) {
            Ok(slot) => slot,
            Err(e) => panic!("{e}"),
        }
    }

    pub(crate) fn slot_mut(&mut self, cursor: &Cursor) -> &mut CursorSlot {
        if let Err(e) = self.check_owner(cursor) {
            panic!("{e}");
        }
        match self.cursors.get_mut(cursor.index, cursor.epoch) {
            Some(slot) => slot,
            None => panic!(
                "{}",
                WalkError::StaleCursor {
                    index: cursor.index,
                    epoch: cursor.epoch,
                }
            ),
        }
    }

    fn check_deref(&self, position: usize) {
        if CHECKED {
            assert!(
                position < self.data.len(),
                "cursor at {position} dereferenced outside 0..{}",
                self.data.len()
            );
        }
    }

    fn require_no_cursors(&self) -> Result<(), WalkError> {
        match self.cursors.live() {
            0 => Ok(()),
            count => Err(WalkError::LiveCursors { count }),
        }
    }

    fn mark(&self) -> StoreMark<T> {
        StoreMark {
            ptr: self.data.as_ptr(),
            capacity: self.data.capacity(),
            len: self.data.len(),
        }
    }

    /// Record a reallocation if the store moved, then rebase every live
    /// cursor through `splice`.
    fn finish(&mut self, mark: StoreMark<T>, splice: Option<Splice>) {
        if mark.ptr != self.data.as_ptr() || mark.capacity != self.data.capacity() {
            self.stats.reallocations += 1;
            log::debug!(
                "WalkVec {}: backing store reallocated, capacity {} -> {}",
                self.id,
                mark.capacity,
                self.data.capacity(),
            );
        }

        let Some(splice) = splice.filter(|s| !s.is_noop()) else {
            return;
        };
        if CHECKED {
            assert_eq!(
                splice.apply_len(mark.len),
                self.data.len(),
                "{splice} does not describe the length change",
            );
        }
        if self.cursors.live() == 0 {
            return;
        }

        let pass = self.cursors.rebase(&splice);
        self.stats.rebase_passes += 1;
        self.stats.cursors_rebased += pass.moved;
        self.stats.cursors_displaced += pass.displaced;
        log::trace!(
            "WalkVec {}: {splice} (len {:+}), {} of {} cursor(s) moved, {} displaced",
            self.id,
            splice.delta(),
            pass.moved,
            self.cursors.live(),
            pass.displaced,
        );

        if CHECKED {
            self.cursors.assert_within(self.data.len());
        }
    }

    /// Bring cursors back into range after the whole store was swapped out.
    fn replaced(&mut self) {
        let pass = self.cursors.clamp(self.data.len());
        self.stats.cursors_rebased += pass.moved;
        self.stats.cursors_displaced += pass.displaced;
    }
}

/// Resolve `range` against a sequence of `len` elements.
fn resolve_range<R: RangeBounds<usize>>(range: &R, len: usize) -> (usize, usize) {
    let start = match range.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s
            .checked_add(1)
            .unwrap_or_else(|| panic!("range start {s} out of range for length {len}")),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&e) => e
            .checked_add(1)
            .unwrap_or_else(|| panic!("range end {e} out of range for length {len}")),
        Bound::Excluded(&e) => e,
        Bound::Unbounded => len,
    };
    assert!(start <= end, "range start {start} after end {end}");
    assert!(end <= len, "range end {end} out of range for length {len}");
    (start, end)
}

impl<T: Clone> WalkVec<T> {
    /// Insert `count` copies of `value` at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_n(&mut self, index: usize, count: usize, value: T) {
        self.insert_iter(index, std::iter::repeat_n(value, count));
    }

    /// Insert `count` copies of `value` before `cursor` and return a cursor
    /// to the first copy.
    pub fn insert_n_at(&mut self, cursor: &Cursor, count: usize, value: T) -> Cursor {
        self.insert_iter_at(cursor, std::iter::repeat_n(value, count))
    }

    /// Grow or shrink to `len` elements, cloning `value` for new ones.
    pub fn resize(&mut self, len: usize, value: T) {
        self.resize_with(len, || value.clone());
    }
}

impl<T> Drop for WalkVec<T> {
    fn drop(&mut self) {
        let live = self.cursors.live();
        if live > 0 {
            log::warn!("WalkVec {} dropped with {live} live cursor(s)", self.id);
        }
    }
}

impl<T> Default for WalkVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for WalkVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkVec")
            .field("id", &self.id)
            .field("data", &self.data)
            .field("live_cursors", &self.cursors.live())
            .finish()
    }
}

/// Clones the elements only. The clone starts with no cursors, fresh
/// statistics and a new id.
impl<T: Clone> Clone for WalkVec<T> {
    fn clone(&self) -> Self {
        let mut copy = Self::from(self.data.clone());
        copy.cursor_warn_threshold = self.cursor_warn_threshold;
        copy
    }
}

impl<T: PartialEq> PartialEq for WalkVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T: Eq> Eq for WalkVec<T> {}

impl<T> From<Vec<T>> for WalkVec<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_parts(data, &WalkVecConfig::default())
    }
}

impl<T> From<WalkVec<T>> for Vec<T> {
    fn from(vec: WalkVec<T>) -> Self {
        vec.into_vec()
    }
}

impl<T> FromIterator<T> for WalkVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<T>>())
    }
}

/// Appends in one rebase pass.
impl<T> Extend<T> for WalkVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let at = self.data.len();
        let mark = self.mark();
        self.data.extend(iter);
        let count = self.data.len() - at;
        self.finish(mark, Some(Splice::insert(at, count)));
    }
}

impl<T> Index<usize> for WalkVec<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        if CHECKED {
            assert!(
                index < self.data.len(),
                "index {index} out of range for WalkVec of length {}",
                self.data.len()
            );
        }
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for WalkVec<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        if CHECKED {
            assert!(
                index < self.data.len(),
                "index {index} out of range for WalkVec of length {}",
                self.data.len()
            );
        }
        &mut self.data[index]
    }
}

impl<'a, T> IntoIterator for &'a WalkVec<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut WalkVec<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter_mut()
    }
}
