//! Container configuration parameters.

use crate::error::WalkError;

/// Configuration for a [`WalkVec`](crate::WalkVec).
///
/// Controls up-front reservations and the live-cursor warning threshold.
/// Validated by [`WalkVec::with_config`](crate::WalkVec::with_config).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkVecConfig {
    /// Element capacity reserved at construction.
    ///
    /// Default: 0 (no allocation until the first push).
    pub initial_capacity: usize,

    /// Cursor registry slots reserved at construction.
    ///
    /// The registry keeps [`WalkVecConfig::INLINE_CURSORS`] slots inline;
    /// values above that allocate once up front instead of on the first
    /// deep nesting.
    pub cursor_capacity: usize,

    /// Live cursor count above which a warning is logged.
    ///
    /// Every mutation walks all live cursors, so a registry that keeps
    /// growing usually means cursors are being leaked rather than
    /// released. Must be non-zero. Default: 64.
    pub cursor_warn_threshold: usize,
}

impl WalkVecConfig {
    /// Registry slots stored inline before spilling to the heap.
    pub const INLINE_CURSORS: usize = 4;

    /// Default live-cursor warning threshold.
    pub const DEFAULT_CURSOR_WARN_THRESHOLD: usize = 64;

    /// Create a config that reserves room for `initial_capacity` elements.
    ///
    /// Uses default values for all other parameters.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            cursor_capacity: Self::INLINE_CURSORS,
            cursor_warn_threshold: Self::DEFAULT_CURSOR_WARN_THRESHOLD,
        }
    }

    /// Set the number of registry slots reserved up front.
    pub fn cursor_capacity(mut self, slots: usize) -> Self {
        self.cursor_capacity = slots;
        self
    }

    /// Set the live-cursor warning threshold.
    pub fn cursor_warn_threshold(mut self, threshold: usize) -> Self {
        self.cursor_warn_threshold = threshold;
        self
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), WalkError> {
        if self.cursor_warn_threshold == 0 {
            return Err(WalkError::InvalidConfig {
                reason: "cursor_warn_threshold must be non-zero".into(),
            });
        }
        if self.cursor_capacity > self.cursor_warn_threshold {
            return Err(WalkError::InvalidConfig {
                reason: format!(
                    "cursor_capacity ({}) exceeds cursor_warn_threshold ({})",
                    self.cursor_capacity, self.cursor_warn_threshold,
                ),
            });
        }
        Ok(())
    }
}

impl Default for WalkVecConfig {
    fn default() -> Self {
        Self::new(0)
    }
}
