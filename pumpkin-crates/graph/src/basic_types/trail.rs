use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::pumpkin_assert_simple;

/// A stack of undo entries, split into segments by checkpoints.
///
/// Restoring to checkpoint `c` pops every entry pushed after the `c`-th call to
/// [`Trail::new_checkpoint`], most recent first.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    entries: Vec<T>,
    /// The length of `entries` when each open checkpoint was created.
    checkpoint_starts: Vec<usize>,
}

impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            entries: Vec::new(),
            checkpoint_starts: Vec::new(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn get_checkpoint(&self) -> usize {
        self.checkpoint_starts.len()
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.checkpoint_starts.push(self.entries.len());
    }

    pub(crate) fn push(&mut self, entry: T) {
        self.entries.push(entry);
    }

    /// Closes every checkpoint above `checkpoint` and hands back the entries they contained,
    /// newest first.
    pub(crate) fn synchronise(&mut self, checkpoint: usize) -> Rev<Drain<'_, T>> {
        pumpkin_assert_simple!(checkpoint < self.get_checkpoint());

        let kept_entries = self.checkpoint_starts[checkpoint];
        self.checkpoint_starts.truncate(checkpoint);
        self.entries.drain(kept_entries..).rev()
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.entries
    }
}
