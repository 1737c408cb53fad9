//! Cursor rebasing across every kind of structural change.
//!
//! Each test holds one or more cursors across a mutation and checks that
//! they still refer to the same logical element, the shifted slot, or the
//! successor of a removed range.

use walkvec::WalkVec;
use walkvec_test_utils::{init_logging, DropTally};

fn seq(n: i32) -> WalkVec<i32> {
    (0..n).collect()
}

// ── Append ────────────────────────────────────────────────────────

#[test]
fn cursor_survives_many_appends() {
    init_logging();
    for k in 0..5 {
        let mut v = seq(5);
        let it = v.cursor_at(k);
        for x in 100..300 {
            v.push(x);
        }
        assert_eq!(*v.current(&it), k as i32);
        assert_eq!(v.position(&it), k);
        v.release(it);
    }
}

#[test]
fn push_then_begin_survives_growth() {
    let mut v = WalkVec::new();
    v.push(1);
    let it = v.begin();
    v.push(2);
    v.push(3);
    assert_eq!(*v.current(&it), 1);
    v.release(it);
}

#[test]
fn end_cursor_follows_push_and_pop() {
    let mut v = seq(2);
    let end = v.end();
    v.push(2);
    assert_eq!(v.position(&end), 3);
    assert!(v.is_end(&end));
    assert_eq!(v.pop(), Some(2));
    assert_eq!(v.position(&end), 2);
    assert!(v.is_end(&end));
    v.release(end);
}

#[test]
fn emplace_back_returns_new_element() {
    let mut v = seq(1);
    let it = v.begin();
    *v.emplace_back(|| 7) += 1;
    assert_eq!(v.as_slice(), &[0, 8]);
    assert_eq!(*v.current(&it), 0);
    v.release(it);
}

// ── Insert ────────────────────────────────────────────────────────

#[test]
fn insert_at_or_before_shifts_forward() {
    for j in 0..=3 {
        let mut v = seq(6);
        let it = v.cursor_at(3);
        v.insert_n(j, 2, -1);
        assert_eq!(v.position(&it), 5, "insert at {j}");
        assert_eq!(*v.current(&it), 3);
        v.release(it);
    }
}

#[test]
fn insert_after_leaves_cursor() {
    for j in 4..=6 {
        let mut v = seq(6);
        let it = v.cursor_at(3);
        v.insert_n(j, 2, -1);
        assert_eq!(v.position(&it), 3, "insert at {j}");
        v.release(it);
    }
}

#[test]
fn insert_at_cursor_returns_inserted_element() {
    let mut v = seq(4);
    let it = v.cursor_at(2);
    let new = v.insert_at(&it, 99);
    assert_eq!(*v.current(&new), 99);
    assert_eq!(*v.current(&it), 2);
    assert_eq!(v.distance(&it, &new), 1);

    let many = v.insert_iter_at(&it, [7, 8, 9]);
    assert_eq!(*v.current(&many), 7);
    assert_eq!(v.position(&new), 2, "before the insertion point");
    assert_eq!(*v.current(&it), 2);
    assert_eq!(v.as_slice(), &[0, 1, 99, 7, 8, 9, 2, 3]);

    let copies = v.insert_n_at(&it, 2, 5);
    assert_eq!(v.position(&copies), 6);
    let built = v.emplace_at(&it, || 4);
    assert_eq!(*v.current(&built), 4);
    assert_eq!(*v.current(&it), 2);

    for c in [it, new, many, copies, built] {
        v.release(c);
    }
}

#[test]
fn empty_insert_is_not_a_rebase() {
    let mut v = seq(3);
    let it = v.cursor_at(1);
    assert_eq!(v.insert_iter(0, std::iter::empty()), 0);
    assert_eq!(v.position(&it), 1);
    assert_eq!(v.stats().rebase_passes, 0);
    v.release(it);
}

// ── Erase ─────────────────────────────────────────────────────────

#[test]
fn erase_front_keeps_cursor_on_value() {
    let mut v: WalkVec<i32> = vec![10, 20, 30, 40, 50].into();
    let it = v.cursor_at(2);
    let first = v.begin();
    let after = v.erase(&first);
    assert_eq!(*v.current(&it), 30);
    assert_eq!(v.position(&it), 1);
    assert_eq!(*v.current(&after), 20);
    for c in [it, first, after] {
        v.release(c);
    }
}

#[test]
fn erase_range_before_shifts_back() {
    let mut v = seq(8);
    let it = v.cursor_at(6);
    v.remove_range(1..4);
    assert_eq!(v.position(&it), 3);
    assert_eq!(*v.current(&it), 6);
    assert!(!v.is_displaced(&it));
    v.release(it);
}

#[test]
fn erase_range_after_leaves_cursor() {
    let mut v = seq(8);
    let it = v.cursor_at(2);
    v.remove_range(3..6);
    assert_eq!(v.position(&it), 2);
    assert_eq!(*v.current(&it), 2);
    v.release(it);
}

#[test]
fn erase_range_containing_cursor_moves_to_successor() {
    let mut v = seq(8);
    let inside = v.cursor_at(4);
    let at_start = v.cursor_at(3);
    v.remove_range(3..6);
    assert_eq!(v.position(&inside), 3);
    assert_eq!(v.position(&at_start), 3);
    assert_eq!(*v.current(&inside), 6);
    assert!(v.is_displaced(&inside));
    assert!(v.is_displaced(&at_start));
    v.release(inside);
    v.release(at_start);
}

#[test]
fn erase_tail_moves_cursor_to_end() {
    let mut v = seq(5);
    let it = v.cursor_at(4);
    v.truncate(2);
    assert_eq!(v.position(&it), 2);
    assert!(v.is_end(&it));
    assert!(v.get_at(&it).is_none());
    v.release(it);
}

#[test]
fn erase_range_between_cursors() {
    let mut v = seq(6);
    let first = v.cursor_at(1);
    let last = v.cursor_at(4);
    let next = v.erase_range(&first, &last);
    assert_eq!(v.as_slice(), &[0, 4, 5]);
    assert_eq!(*v.current(&next), 4);
    assert_eq!(*v.current(&last), 4);
    assert!(!v.is_displaced(&last));
    assert!(v.is_displaced(&first));
    for c in [first, last, next] {
        v.release(c);
    }
}

#[test]
fn empty_erase_range_is_noop() {
    let mut v = seq(3);
    let a = v.cursor_at(1);
    let b = v.duplicate(&a);
    let next = v.erase_range(&a, &b);
    assert_eq!(v.len(), 3);
    assert_eq!(v.position(&next), 1);
    assert!(!v.is_displaced(&a));
    for c in [a, b, next] {
        v.release(c);
    }
}

#[test]
fn remove_range_accepts_any_bounds() {
    let mut v = seq(10);
    assert_eq!(v.remove_range(..2), 2);
    assert_eq!(v.remove_range(6..), 2);
    assert_eq!(v.remove_range(1..=2), 2);
    assert_eq!(v.as_slice(), &[2, 5, 6, 7]);
}

#[test]
#[should_panic(expected = "before first")]
fn inverted_erase_range_panics() {
    let mut v = seq(4);
    let first = v.cursor_at(3);
    let last = v.cursor_at(1);
    let _ = v.erase_range(&first, &last);
}

#[test]
fn displaced_cleared_by_explicit_move() {
    let mut v = seq(4);
    let it = v.cursor_at(1);
    v.remove(1);
    assert!(v.is_displaced(&it));
    v.advance(&it);
    assert!(!v.is_displaced(&it));
    assert_eq!(*v.current(&it), 3);
    v.release(it);
}

// ── Resize, reserve ───────────────────────────────────────────────

#[test]
fn resize_is_one_rebase_pass() {
    let mut v = seq(4);
    let end = v.end();
    let it = v.cursor_at(3);

    v.resize(10, 0);
    assert_eq!(v.position(&end), 10);
    assert_eq!(v.stats().rebase_passes, 1);

    v.resize(2, 0);
    assert_eq!(v.position(&end), 2);
    assert_eq!(v.position(&it), 2);
    assert!(v.is_displaced(&it));
    assert_eq!(v.stats().rebase_passes, 2);

    v.resize_default(2);
    assert_eq!(v.stats().rebase_passes, 2, "same length is not a pass");
    v.resize_with(3, || 9);
    assert_eq!(v.as_slice(), &[0, 1, 9]);

    v.release(end);
    v.release(it);
}

#[test]
fn reserve_preserves_logical_position() {
    init_logging();
    let mut v = seq(4);
    v.shrink_to_fit();
    let it = v.cursor_at(2);
    let before = v.capacity();
    v.reserve(before * 8 + 32);
    assert!(v.capacity() > before);
    assert!(v.stats().reallocations >= 1);
    assert_eq!(*v.current(&it), 2);
    assert_eq!(v.stats().rebase_passes, 0, "reallocation alone moves no cursor");

    v.reserve_exact(1);
    v.shrink_to_fit();
    assert_eq!(*v.current(&it), 2);
    v.release(it);
}

// ── Registry ──────────────────────────────────────────────────────

#[test]
fn released_cursor_leaves_hole_that_rebase_skips() {
    let mut v = seq(10);
    let a = v.cursor_at(1);
    let b = v.cursor_at(5);
    let c = v.cursor_at(8);
    v.release(b);
    assert_eq!(v.live_cursors(), 2);
    assert_eq!(v.cursor_slots(), 3);

    v.insert(0, -1);
    v.remove(3);
    assert_eq!(*v.current(&a), 1);
    assert_eq!(*v.current(&c), 8);

    v.release(c);
    assert_eq!(v.cursor_slots(), 1, "trailing holes trimmed");
    v.release(a);
    assert_eq!(v.cursor_slots(), 0);
}

#[test]
fn many_cursors_rebase_independently() {
    let mut v = seq(20);
    let cursors: Vec<_> = (0..20).map(|i| v.cursor_at(i)).collect();
    v.remove_range(5..10);
    v.insert_n(0, 3, -1);
    for (i, c) in cursors.iter().enumerate() {
        let value = *v.current(c);
        if (5..10).contains(&i) {
            assert_eq!(value, 10, "cursor {i} moved to successor");
        } else {
            assert_eq!(value, i as i32);
        }
    }
    for c in cursors {
        v.release(c);
    }
    assert_eq!(v.stats().peak_live_cursors, 20);
}

// ── Cursor navigation ─────────────────────────────────────────────

#[test]
fn cursor_navigation() {
    let mut v = seq(6);
    let a = v.begin();
    let b = v.end();
    assert_eq!(v.distance(&b, &a), 6);
    assert_eq!(v.cursor_cmp(&a, &b), std::cmp::Ordering::Less);

    v.seek(&a, 4);
    assert_eq!(*v.current(&a), 4);
    v.retreat(&a);
    assert_eq!(*v.current(&a), 3);
    assert_eq!(v.peek(&a, 2), Some(&5));
    assert_eq!(v.peek(&a, -4), None);
    assert_eq!(v.peek(&a, 3), None);

    v.assign(&b, &a);
    assert_eq!(v.position(&b), 3);
    *v.current_mut(&b) = 30;
    assert_eq!(v.get_at(&a), Some(&30));
    if let Some(x) = v.get_at_mut(&a) {
        *x += 1;
    }
    assert_eq!(v[3], 31);

    v.release(a);
    v.release(b);
}

#[test]
fn duplicate_registers_a_second_cursor() {
    let mut v = seq(3);
    let a = v.cursor_at(1);
    let b = v.duplicate(&a);
    assert_ne!(a, b);
    assert_eq!(v.live_cursors(), 2);
    v.advance(&b);
    assert_eq!(v.position(&a), 1);
    assert_eq!(v.position(&b), 2);
    v.release(a);
    v.release(b);
}

// ── Walks ─────────────────────────────────────────────────────────

#[test]
fn retain_walk_visits_each_element_once() {
    let mut v = seq(10);
    let mut visited = Vec::new();
    v.retain_walk(|x| {
        visited.push(*x);
        *x % 3 != 0
    });
    assert_eq!(visited, (0..10).collect::<Vec<_>>());
    assert_eq!(v.as_slice(), &[1, 2, 4, 5, 7, 8]);
    assert_eq!(v.live_cursors(), 0);
}

#[test]
fn walk_rebases_outer_cursor() {
    let mut v = seq(5);
    let outer = v.cursor_at(3);
    v.retain_walk(|x| *x != 1);
    assert_eq!(*v.current(&outer), 3);
    v.release(outer);
}

#[test]
fn walk_can_grow_the_container() {
    let mut v = seq(3);
    let mut walk = v.walk();
    while let Some(x) = walk.next() {
        if *x < 3 {
            let next = *x + 10;
            walk.vec().push(next);
        }
    }
    drop(walk);
    assert_eq!(v.as_slice(), &[0, 1, 2, 10, 11, 12]);
}

// ── Element lifetimes ─────────────────────────────────────────────

#[test]
fn removal_paths_drop_each_element_once() {
    let drops = DropTally::counter();
    let mut v: WalkVec<DropTally> = (0..10).map(|i| DropTally::new(i, &drops)).collect();

    let removed = v.remove(0);
    assert_eq!(removed.value, 0);
    drop(removed);
    assert_eq!(drops.get(), 1);

    v.remove_range(0..3);
    assert_eq!(drops.get(), 4);
    v.truncate(4);
    assert_eq!(drops.get(), 6);
    drop(v.pop());
    assert_eq!(drops.get(), 7);
    v.clear();
    assert_eq!(drops.get(), 10);
    v.resize(2, DropTally::new(99, &drops));
    assert_eq!(drops.get(), 11, "the template value is dropped");
    drop(v);
    assert_eq!(drops.get(), 13);
}
