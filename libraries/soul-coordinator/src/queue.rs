//! Continuation queue
//!
//! Ordered waiting list of items that haven't started yet. Items are appended
//! by the client-facing layer and consumed from the head, one per
//! buffering-complete signal, when the coordinator primes the next track.
//!
//! ```text
//! Currently playing: A (buffering)
//! ─────────────────────────────
//! Waiting:
//!   - B (disk)    <- primed on next buffering-complete
//!   - C (stream)
//! ```

use crate::types::QueuedItem;
use std::collections::VecDeque;

/// FIFO of not-yet-started items
///
/// No de-duplication: the same locator may be queued any number of times.
#[derive(Debug, Clone, Default)]
pub struct ContinuationQueue {
    items: VecDeque<QueuedItem>,
}

impl ContinuationQueue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the tail
    pub fn push(&mut self, item: QueuedItem) {
        self.items.push_back(item);
    }

    /// Remove and return the head item
    pub fn pop_next(&mut self) -> Option<QueuedItem> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Items in the order they will be primed
    pub fn iter(&self) -> impl Iterator<Item = &QueuedItem> {
        self.items.iter()
    }
}
