//! Sliding-window minimum via a monotonic deque.
//!
//! Values are admitted in index order and retired when the window slides
//! past them. Each value enters and leaves the deque at most once, so a
//! full pass over M values costs O(M) regardless of the window length,
//! while the reported minimum matches a rescan of the exact window.

use std::collections::VecDeque;

#[derive(Debug)]
pub(crate) struct MinTracker {
    /// (index, value) pairs with strictly increasing values; the front is
    /// the minimum of the admitted window.
    deque: VecDeque<(usize, f32)>,
}

impl MinTracker {
    pub(crate) fn new() -> Self {
        Self {
            deque: VecDeque::new(),
        }
    }

    /// Forgets all admitted values.
    pub(crate) fn clear(&mut self) {
        self.deque.clear();
    }

    /// Admits the value at `index`. Indices must be pushed in order.
    pub(crate) fn push(&mut self, index: usize, value: f32) {
        debug_assert!(self.deque.back().is_none_or(|&(idx, _)| idx < index));
        while self.deque.back().is_some_and(|&(_, back)| back >= value) {
            self.deque.pop_back();
        }
        self.deque.push_back((index, value));
    }

    /// Retires values whose index is below `start`.
    pub(crate) fn evict_before(&mut self, start: usize) {
        while self.deque.front().is_some_and(|&(idx, _)| idx < start) {
            self.deque.pop_front();
        }
    }

    /// Minimum over the currently admitted window.
    pub(crate) fn min(&self) -> f32 {
        debug_assert!(!self.deque.is_empty());
        self.deque.front().map_or(f32::INFINITY, |&(_, v)| v)
    }
}
