//! Chunk window cursor

use std::num::NonZeroU64;

/// Cursor producing contiguous, inclusive `[from, to]` windows over
/// `[1, upper_bound]`.
///
/// A fresh cursor sits before the first window (`from = 1`, `to = 0`).
/// Every successful [`advance`](Range::advance) moves to the next window;
/// once `to` reaches the upper bound the cursor is exhausted for good.
///
/// # Examples
/// ```
/// use bl_transfer::Range;
/// use std::num::NonZeroU64;
///
/// let mut range = Range::new(NonZeroU64::new(4).unwrap(), 10);
/// let mut windows = Vec::new();
/// while range.advance() {
///     windows.push((range.from(), range.to()));
/// }
/// assert_eq!(windows, vec![(1, 4), (5, 8), (9, 10)]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    chunk_size: NonZeroU64,
    upper_bound: u64,
    from: u64,
    to: u64,
}

impl Range {
    /// Create a cursor positioned before the first window
    pub fn new(chunk_size: NonZeroU64, upper_bound: u64) -> Self {
        Self {
            chunk_size,
            upper_bound,
            from: 1,
            to: 0,
        }
    }

    /// Move to the next window.
    ///
    /// Returns `false` without changing state when the domain is exhausted.
    pub fn advance(&mut self) -> bool {
        if self.to >= self.upper_bound {
            return false;
        }
        self.from = self.to + 1;
        self.to = self
            .to
            .saturating_add(self.chunk_size.get())
            .min(self.upper_bound);
        true
    }

    /// First row sequence of the current window
    pub fn from(&self) -> u64 {
        self.from
    }

    /// Last row sequence of the current window (inclusive)
    pub fn to(&self) -> u64 {
        self.to
    }

    /// Row sequences left after the current window
    pub fn remaining(&self) -> u64 {
        self.upper_bound - self.to
    }

    /// Number of windows a fresh cursor with these settings produces
    pub fn window_count(&self) -> u64 {
        self.upper_bound.div_ceil(self.chunk_size.get())
    }
}

#[cfg(test)]
#[path = "range_test.rs"]
mod tests;
