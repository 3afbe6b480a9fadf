//! Bounded FIFO of descriptor pool indices.
//!
//! The three transaction queues (ready, progress, complete) hold indices into
//! the unit's descriptor pool rather than pointers, so a slot can be moved
//! between queues without any allocation. Each queue is a plain ring; the
//! unit wraps it in a [`CriticalSectionCell`](crate::sync::CriticalSectionCell)
//! so task and interrupt context can push and pop concurrently.

/// Circular index queue with capacity `N`.
pub struct TransQueue<const N: usize> {
    /// Ring storage
    slots: [usize; N],
    /// Index of the oldest entry
    head: usize,
    /// Number of queued entries
    len: usize,
}

impl<const N: usize> TransQueue<N> {
    /// Create an empty queue. Const-compatible.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [0; N],
            head: 0,
            len: 0,
        }
    }

    /// Create a queue already holding `0..count`, in order.
    #[must_use]
    pub fn filled(count: usize) -> Self {
        let mut queue = Self::new();
        for slot in 0..count.min(N) {
            let _ = queue.push(slot);
        }
        queue
    }

    /// Number of queued entries
    #[inline(always)]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check if no entry is queued
    #[inline(always)]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if the queue cannot take another entry
    #[inline(always)]
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.len == N
    }

    /// Append `slot` at the tail. Returns `false` when full.
    #[must_use]
    pub fn push(&mut self, slot: usize) -> bool {
        if self.is_full() {
            return false;
        }
        let tail = (self.head + self.len) % N;
        self.slots[tail] = slot;
        self.len += 1;
        true
    }

    /// Remove the oldest entry.
    pub fn pop(&mut self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let slot = self.slots[self.head];
        self.head = (self.head + 1) % N;
        self.len -= 1;
        Some(slot)
    }

    /// Iterate over queued entries, oldest first.
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).map(move |i| self.slots[(self.head + i) % N])
    }
}

impl<const N: usize> Default for TransQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;
    use std::vec::Vec;

    use super::*;

    #[test]
    fn new_queue_is_empty() {
        let mut queue: TransQueue<4> = TransQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn push_pop_is_fifo() {
        let mut queue: TransQueue<4> = TransQueue::new();
        assert!(queue.push(2));
        assert!(queue.push(0));
        assert!(queue.push(3));

        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(0));
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn push_fails_when_full() {
        let mut queue: TransQueue<2> = TransQueue::new();
        assert!(queue.push(0));
        assert!(queue.push(1));
        assert!(queue.is_full());
        assert!(!queue.push(2));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn wraps_around() {
        let mut queue: TransQueue<3> = TransQueue::new();
        for round in 0..10 {
            assert!(queue.push(round));
            assert!(queue.push(round + 100));
            assert_eq!(queue.pop(), Some(round));
            assert_eq!(queue.pop(), Some(round + 100));
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn filled_holds_every_slot_in_order() {
        let queue: TransQueue<4> = TransQueue::filled(3);
        assert_eq!(queue.iter().collect::<Vec<_>>(), [0, 1, 2]);
    }

    #[test]
    fn filled_clamps_to_capacity() {
        let queue: TransQueue<2> = TransQueue::filled(5);
        assert_eq!(queue.len(), 2);
    }
}
