//! A growable array that stays safe to mutate while cursors walk it.
//!
//! [`WalkVec<T>`] behaves like `Vec<T>` but hands out registered
//! [`Cursor`]s instead of borrowing iterators. Every structural change
//! (push, insert, erase, resize, clear) rebases all live cursors so each
//! one keeps pointing at the same logical element, and reallocation of the
//! backing store never invalidates them.
//!
//! # Architecture
//!
//! ```text
//! WalkVec<T>
//! ├── Vec<T>                 backing store
//! ├── CursorRegistry         SmallVec<[Option<CursorSlot>; 4]>
//! │   └── CursorSlot         { epoch, position, displaced }
//! ├── WalkStats              reallocation / rebase counters
//! └── VecInstanceId          matches Cursor::owner
//!
//! Cursor                     (owner, registry slot, epoch) handle
//! Walk<'a, T>                &mut WalkVec + one owned Cursor
//! ```
//!
//! Cursor positions are plain indices held by the container, so a cursor
//! never dangles: a handle from another container, or one already
//! released, is detected by its owner id and epoch.
//!
//! # Rebase rules
//!
//! For a cursor at position `p`:
//!
//! - inserting `n` elements at `i <= p` moves it to `p + n`,
//! - removing `[s, e)` with `e <= p` moves it to `p - (e - s)`,
//! - removing `[s, e)` with `s <= p < e` moves it to `s` (the successor of
//!   the removed range) and marks it displaced,
//! - anything after the cursor leaves it alone.
//!
//! The pure arithmetic lives in [`walkvec_core::Splice`].
//!
//! # Checked builds
//!
//! Debug builds, and release builds with the `checked` feature, assert that
//! cursors stay within `0..=len`, that dereferenced cursors are not at the
//! end, and that `clear`/`swap_*` run with no live cursors. Without them
//! those conditions saturate or clamp instead. See [`CHECKED`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod cursor;
pub mod error;
mod registry;
pub mod stats;
pub mod vec;
pub mod walk;

pub use config::WalkVecConfig;
pub use cursor::Cursor;
pub use error::WalkError;
pub use stats::WalkStats;
pub use vec::WalkVec;
pub use walk::Walk;
pub use walkvec_core::{CursorEpoch, Splice, VecInstanceId, CHECKED};
