//! Tick journal for undoing node state.
//!
//! Every `emit` on a stream opens a `Journal` that travels with the value
//! through the downstream graph. Stateful nodes (`accumulate`, `scan`, the
//! zip buffers) record how to restore their previous state; if any
//! subscriber fails, the journal is rolled back in reverse order so the
//! aborted tick leaves no trace. On success the journal is dropped.

use alloc::boxed::Box;
use alloc::vec::Vec;

/// Undo log for one delivered value.
#[derive(Default)]
pub struct Journal {
    /// Undo actions, in the order the changes were made.
    entries: Vec<Box<dyn FnOnce()>>,
}

impl Journal {
    /// Creates an empty journal.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Records an action restoring state changed during this tick.
    pub fn record<F>(&mut self, undo: F)
    where
        F: FnOnce() + 'static,
    {
        self.entries.push(Box::new(undo));
    }

    /// Returns the number of recorded changes.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Undoes every recorded change, newest first.
    pub fn rollback(self) {
        for undo in self.entries.into_iter().rev() {
            undo();
        }
    }
}

impl core::fmt::Debug for Journal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Journal")
            .field("entries", &self.entries.len())
            .finish()
    }
}
