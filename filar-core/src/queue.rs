//! Fixed-capacity byte FIFO
//!
//! Backing store for a channel's transmit and receive directions. The queue
//! itself is unsynchronized; the owning channel serializes access from the
//! two execution contexts behind its critical section.

use heapless::Deque;

/// Error returned by [`ByteQueue::push`] when the queue is full
///
/// The queue keeps its oldest contents; the newest byte is the one rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Overrun;

/// Fixed-capacity FIFO of bytes
///
/// `N` is the capacity in bytes, fixed at the type level so queues can be
/// embedded in `static` channels without allocation.
#[derive(Default)]
pub struct ByteQueue<const N: usize> {
    buf: Deque<u8, N>,
}

impl<const N: usize> ByteQueue<N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self { buf: Deque::new() }
    }

    /// Append a byte at the tail
    ///
    /// A full queue rejects the byte and returns [`Overrun`].
    pub fn push(&mut self, byte: u8) -> Result<(), Overrun> {
        self.buf.push_back(byte).map_err(|_| Overrun)
    }

    /// Remove and return the oldest byte, or `None` when empty
    pub fn pop(&mut self) -> Option<u8> {
        self.buf.pop_front()
    }

    /// Number of buffered bytes
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True when no bytes are buffered
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// True when another `push` would be rejected
    pub fn is_full(&self) -> bool {
        self.buf.is_full()
    }

    /// Capacity in bytes
    pub fn capacity(&self) -> usize {
        N
    }

    /// Discard all buffered bytes
    pub fn clear(&mut self) {
        self.buf.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fifo_order() {
        let mut q: ByteQueue<8> = ByteQueue::new();
        q.push(1).unwrap();
        q.push(2).unwrap();
        q.push(3).unwrap();

        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.pop(), Some(3));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn test_full_queue_rejects_newest() {
        let mut q: ByteQueue<4> = ByteQueue::new();
        for b in 0..4 {
            q.push(b).unwrap();
        }
        assert!(q.is_full());

        // Rejected byte leaves the queue untouched
        assert_eq!(q.push(99), Err(Overrun));
        assert_eq!(q.len(), 4);
        assert_eq!(q.pop(), Some(0));
    }

    #[test]
    fn test_clear_discards_everything() {
        let mut q: ByteQueue<8> = ByteQueue::new();
        q.push(7).unwrap();
        q.push(8).unwrap();
        q.clear();

        assert!(q.is_empty());
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn test_len_tracks_push_and_pop() {
        let mut q: ByteQueue<8> = ByteQueue::new();
        assert_eq!(q.len(), 0);
        q.push(1).unwrap();
        q.push(2).unwrap();
        assert_eq!(q.len(), 2);
        q.pop();
        assert_eq!(q.len(), 1);
        assert_eq!(q.capacity(), 8);
    }

    #[test]
    fn test_reusable_after_wrap() {
        // Exercise index wrapping: fill, drain and refill past the capacity
        let mut q: ByteQueue<4> = ByteQueue::new();
        for round in 0u8..10 {
            for i in 0..4 {
                q.push(round.wrapping_mul(4).wrapping_add(i)).unwrap();
            }
            for i in 0..4 {
                assert_eq!(q.pop(), Some(round.wrapping_mul(4).wrapping_add(i)));
            }
        }
        assert!(q.is_empty());
    }

    proptest! {
        #[test]
        fn prop_drains_in_insertion_order(data in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut q: ByteQueue<64> = ByteQueue::new();
            for &b in &data {
                q.push(b).unwrap();
            }
            for &b in &data {
                prop_assert_eq!(q.pop(), Some(b));
            }
            prop_assert_eq!(q.pop(), None);
        }

        #[test]
        fn prop_interleaved_push_pop_preserves_order(
            data in proptest::collection::vec(any::<u8>(), 0..128),
            chunk in 1usize..8,
        ) {
            // Push and pop in interleaved chunks; output must equal input.
            let mut q: ByteQueue<8> = ByteQueue::new();
            let mut out = std::vec::Vec::new();
            for block in data.chunks(chunk.min(8)) {
                for &b in block {
                    q.push(b).unwrap();
                }
                while let Some(b) = q.pop() {
                    out.push(b);
                }
            }
            prop_assert_eq!(out, data);
        }
    }
}
