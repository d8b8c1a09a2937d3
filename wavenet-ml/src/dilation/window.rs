//! Strided windows over a circular buffer
//!
//! A dilated kernel with `count` taps at stride `stride` reads the positions
//!
//! ```text
//! end - (count-1)·stride, …, end - stride, end      (mod capacity)
//! ```
//!
//! When the first position falls before the buffer origin the window wraps:
//!
//! ```text
//!            head                         tail
//!   |6|7|8|1|2|3|4|5|          start = end - (count-1)·stride < 0
//!    ^   ^                          ^   ^
//!    end%stride..=end               capacity+start..capacity
//! ```
//!
//! and is read as the wrapped tail followed by the head, in chronological
//! order. [`StridedWindow`] describes both cases as at most two strided
//! index ranges so callers never repeat the wrap arithmetic.

use std::iter::StepBy;
use std::ops::Range;

/// Half-open strided index range `start..stop` stepping by `step`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StridedRange {
    pub start: usize,
    pub stop: usize,
    pub step: usize,
}

impl StridedRange {
    pub fn iter(&self) -> StepBy<Range<usize>> {
        (self.start..self.stop).step_by(self.step)
    }

    pub fn len(&self) -> usize {
        if self.stop <= self.start {
            0
        } else {
            (self.stop - self.start).div_ceil(self.step)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Positions read by one dilated kernel application, oldest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StridedWindow {
    /// Part of the window that wrapped past the buffer origin
    pub tail: Option<StridedRange>,
    pub head: StridedRange,
}

impl StridedWindow {
    /// Smallest buffer able to hold `count` taps at `stride`
    pub const fn required_capacity(count: usize, stride: usize) -> usize {
        stride * count.saturating_sub(1) + 1
    }

    /// Window of `count` taps at `stride` ending at `end` in a buffer of
    /// `capacity` slots.
    ///
    /// Precondition: `count >= 1`, `stride >= 1`, `end < capacity` and
    /// `capacity >= required_capacity(count, stride)`. Not checked in
    /// release builds; queue constructors establish it once.
    pub fn new(end: usize, count: usize, stride: usize, capacity: usize) -> Self {
        debug_assert!(count >= 1 && stride >= 1);
        debug_assert!(end < capacity);
        debug_assert!(capacity >= Self::required_capacity(count, stride));

        let span = (count - 1) * stride;
        if span <= end {
            return Self {
                tail: None,
                head: StridedRange {
                    start: end - span,
                    stop: end + 1,
                    step: stride,
                },
            };
        }

        // start = end - span is negative; it lands at capacity + start
        Self {
            tail: Some(StridedRange {
                start: capacity + end - span,
                stop: capacity,
                step: stride,
            }),
            head: StridedRange {
                start: end % stride,
                stop: end + 1,
                step: stride,
            },
        }
    }

    pub fn is_wrapped(&self) -> bool {
        self.tail.is_some()
    }

    pub fn len(&self) -> usize {
        self.tail.map_or(0, |t| t.len()) + self.head.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Buffer indices in read order (tail, then head)
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.tail
            .iter()
            .flat_map(StridedRange::iter)
            .chain(self.head.iter())
    }
}
