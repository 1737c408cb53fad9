//! Identifiers and rebase arithmetic for the walkvec container.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! pieces of the container that can be reasoned about without any storage:
//! instance and epoch identifiers, the [`Splice`] description of a
//! structural change, and the pure [`Splice::rebase`] function every live
//! cursor is passed through after a mutation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod splice;

pub use id::{CursorEpoch, VecInstanceId};
pub use splice::{Rebased, Splice};

/// Whether window and live-cursor assertions are compiled in.
///
/// True in debug builds, and in release builds with the `checked` feature.
/// Callers gate assertions on this constant rather than on
/// `cfg(debug_assertions)` directly so both switches behave the same.
pub const CHECKED: bool = cfg!(any(debug_assertions, feature = "checked"));
