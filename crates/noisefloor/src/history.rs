//! Fixed-length sliding history.
//!
//! A logical FIFO that always holds exactly its configured number of
//! values: pushing a new value evicts the oldest. Backed by a ring buffer
//! so a push is O(1) with no element shifting.

#[derive(Debug, Clone)]
pub(crate) struct History {
    data: Vec<f32>,
    /// Index of the oldest element; the next push overwrites it.
    head: usize,
}

impl History {
    /// Creates a history of `len` entries, all set to `value`.
    pub(crate) fn filled(len: usize, value: f32) -> Self {
        debug_assert!(len > 0);
        Self {
            data: vec![value; len],
            head: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    /// Appends `value`, evicting the oldest entry.
    pub(crate) fn push(&mut self, value: f32) {
        self.data[self.head] = value;
        self.head = (self.head + 1) % self.data.len();
    }

    /// Sum over all entries.
    pub(crate) fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    /// Iterates the entries oldest to newest.
    pub(crate) fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        let (wrapped, oldest) = self.data.split_at(self.head);
        oldest.iter().chain(wrapped.iter()).copied()
    }

    /// Iterates the `count` most recent entries, oldest first.
    pub(crate) fn tail(&self, count: usize) -> impl Iterator<Item = f32> + '_ {
        debug_assert!(count <= self.len());
        self.iter().skip(self.len() - count)
    }

    /// Snapshot of the entries, oldest first.
    pub(crate) fn to_vec(&self) -> Vec<f32> {
        self.iter().collect()
    }
}
