//! Container-specific error types.

use std::error::Error;
use std::fmt;

use walkvec_core::{CursorEpoch, VecInstanceId};

/// Errors that can occur during container operations.
///
/// Only the `try_*` and checked-access methods return these. The rest of
/// the API treats the same conditions as programmer errors and panics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WalkError {
    /// An index was not below the container length.
    OutOfRange {
        /// The requested index.
        index: usize,
        /// Length of the container at the time of the request.
        len: usize,
    },
    /// The operation requires that no cursors are registered.
    LiveCursors {
        /// Number of cursors still registered.
        count: usize,
    },
    /// A cursor issued by a different container.
    ForeignCursor {
        /// The container the cursor was used with.
        expected: VecInstanceId,
        /// The container that issued the cursor.
        found: VecInstanceId,
    },
    /// A cursor whose registration no longer exists.
    StaleCursor {
        /// Registry slot encoded in the cursor.
        index: usize,
        /// Registration epoch encoded in the cursor.
        epoch: CursorEpoch,
    },
    /// Configuration rejected at construction.
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::LiveCursors { count } => {
                write!(f, "{count} cursor(s) still registered")
            }
            Self::ForeignCursor { expected, found } => {
                write!(
                    f,
                    "cursor issued by container {found} used with container {expected}"
                )
            }
            Self::StaleCursor { index, epoch } => {
                write!(f, "stale cursor: slot {index}, epoch {epoch}")
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid configuration: {reason}")
            }
        }
    }
}

impl Error for WalkError {}
