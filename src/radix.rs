//! Radix Heap implementation
//!
//! A monotone priority queue for unsigned integer priorities.
//!
//! # Monotone Property
//!
//! A radix heap is a **monotone priority queue**: it keeps a baseline `last`
//! (the most recently extracted minimum) and refuses any priority below it.
//! Extracted priorities therefore never decrease over the heap's lifetime.
//! This is naturally satisfied by Dijkstra's algorithm with non-negative edge
//! weights and by event simulations that never schedule into the past.
//!
//! # Buckets
//!
//! Bucket 0 holds entries whose priority equals `last`. Bucket `i > 0` holds
//! entries whose XOR with `last` has its highest set bit at position `i - 1`.
//! When bucket 0 runs dry, the smallest non-empty bucket is *rebalanced*: its
//! minimum becomes the new `last` and its entries are redistributed into finer
//! buckets, which always lands at least that minimum in bucket 0.
//!
//! # Time Complexity
//!
//! | Operation   | Complexity            |
//! |-------------|-----------------------|
//! | `push`      | O(1)                  |
//! | `pop`       | O(log C) amortized*   |
//! | `peek`      | O(1) expected**       |
//! | `merge`     | O(m)***               |
//!
//! *Where C is the maximum difference between any key and the baseline when
//! inserted. Each entry can only move to a lower bucket, at most `BITS` times.
//!
//! **O(1) when bucket 0 holds elements; otherwise a scan of the smallest
//! non-empty bucket.
//!
//! ***Where m is the size of the heap that gets re-pushed.
//!
//! # References
//!
//! - Ahuja, R. K., Mehlhorn, K., Orlin, J. B., & Tarjan, R. E. (1990).
//!   "Faster algorithms for the shortest path problem."
//!   *Journal of the ACM*, 37(2), 213-223.
//!
//! # Example
//!
//! ```rust
//! use meldheap::{Heap, HeapError, RadixHeap};
//!
//! let mut heap: RadixHeap<&str, u32> = RadixHeap::new();
//! heap.push("ten", 10).unwrap();
//! heap.push("five", 5).unwrap();
//!
//! assert_eq!(heap.pop(), Ok(("five", 5)));
//! assert_eq!(heap.push("three", 3), Err(HeapError::PriorityBelowBaseline));
//! ```

use crate::entry::Entry;
use crate::traits::{Heap, HeapError, MeldableHeap, Result};
use std::collections::VecDeque;
use tracing::trace;

/// Trait for keys that can be used in a radix heap.
///
/// This trait provides the bit-level operations needed for bucket assignment.
/// It is implemented for all unsigned integer types.
///
/// Implementations must satisfy:
/// - `BITS` must equal the number of bits in the type
/// - `leading_zeros()` must return the number of leading zero bits
/// - `Default::default()` must be zero
pub trait RadixKey: Ord + Copy + Default {
    /// Number of bits in this key type
    const BITS: u32;

    /// Returns the number of leading zeros in the binary representation
    fn leading_zeros(self) -> u32;

    /// Compute XOR of two keys (for finding the differing high bit)
    fn bitxor(self, other: Self) -> Self;
}

macro_rules! impl_radix_key {
    ($($t:ty),+) => {
        $(
            impl RadixKey for $t {
                const BITS: u32 = <$t>::BITS;

                #[inline]
                fn leading_zeros(self) -> u32 {
                    <$t>::leading_zeros(self)
                }

                #[inline]
                fn bitxor(self, other: Self) -> Self {
                    self ^ other
                }
            }
        )+
    };
}

impl_radix_key!(u8, u16, u32, u64, u128, usize);

/// A radix heap (monotone min-priority queue)
///
/// # Type Parameters
///
/// - `V`: The value type stored in the heap
/// - `P`: The priority type, must implement [`RadixKey`] (unsigned integers)
///
/// Entries with equal priority leave the heap in the order they reached
/// bucket 0.
#[derive(Debug, Clone)]
pub struct RadixHeap<V, P: RadixKey> {
    /// Buckets indexed by the highest differing bit from `last`.
    buckets: Vec<VecDeque<Entry<V, P>>>,

    /// The current baseline; never decreases except through `merge`
    last: P,

    /// Total number of elements
    len: usize,
}

impl<V, P: RadixKey> RadixHeap<V, P> {
    /// Creates an empty heap with a baseline of zero
    pub fn new() -> Self {
        // BITS + 1 buckets: bucket 0 for exact matches, buckets 1..=BITS for
        // differences at each bit position.
        let buckets = (0..=P::BITS).map(|_| VecDeque::new()).collect();
        RadixHeap {
            buckets,
            last: P::default(),
            len: 0,
        }
    }

    /// The current baseline: no priority below it is accepted
    pub fn baseline(&self) -> P {
        self.last
    }

    /// Compute the bucket index for a priority value.
    ///
    /// Returns 0 if `priority == last`, otherwise `⌊log₂(priority ^ last)⌋ + 1`.
    #[inline]
    fn bucket_index(&self, priority: P) -> usize {
        let diff = priority.bitxor(self.last);
        // Compare against zero directly; going through usize would truncate
        // u128 keys on 32-bit targets.
        if diff == P::default() {
            0
        } else {
            (P::BITS - diff.leading_zeros()) as usize
        }
    }

    /// Index of the smallest non-empty bucket above 0
    fn first_nonempty(&self) -> Option<usize> {
        (1..self.buckets.len()).find(|&i| !self.buckets[i].is_empty())
    }

    /// Moves the minimum of the smallest non-empty bucket into bucket 0
    ///
    /// # Errors
    /// - [`HeapError::HeapEmpty`] if there is nothing to rebalance
    /// - [`HeapError::RebalanceNotNeeded`] if bucket 0 already holds elements
    pub fn rebalance(&mut self) -> Result<()> {
        if self.len == 0 {
            return Err(HeapError::HeapEmpty);
        }
        if !self.buckets[0].is_empty() {
            return Err(HeapError::RebalanceNotNeeded);
        }
        let Some(source) = self.first_nonempty() else {
            return Err(HeapError::HeapEmpty);
        };

        let entries = std::mem::take(&mut self.buckets[source]);
        if let Some(min) = entries.iter().map(|e| e.priority).min() {
            self.last = min;
        }
        trace!(source, moved = entries.len(), "rebalancing radix heap");
        for entry in entries {
            let bucket = self.bucket_index(entry.priority);
            self.buckets[bucket].push_back(entry);
        }
        Ok(())
    }

    fn insert(&mut self, entry: Entry<V, P>) {
        let bucket = self.bucket_index(entry.priority);
        self.buckets[bucket].push_back(entry);
        self.len += 1;
    }
}

impl<V, P: RadixKey> Heap<V, P> for RadixHeap<V, P> {
    type Handle = ();

    fn push(&mut self, value: V, priority: P) -> Result<()> {
        if priority < self.last {
            return Err(HeapError::PriorityBelowBaseline);
        }
        self.insert(Entry::new(value, priority));
        Ok(())
    }

    fn pop(&mut self) -> Result<(V, P)> {
        if self.buckets[0].is_empty() {
            self.rebalance()?;
        }
        let entry = self.buckets[0].pop_front().ok_or(HeapError::HeapEmpty)?;
        self.len -= 1;
        Ok(entry.into_parts())
    }

    fn peek(&self) -> Result<(&V, &P)> {
        if let Some(entry) = self.buckets[0].front() {
            return Ok(entry.as_refs());
        }
        // Without restructuring, the answer is the first minimum of the
        // bucket the next rebalance would split.
        self.first_nonempty()
            .and_then(|i| self.buckets[i].iter().min_by_key(|e| e.priority))
            .map(Entry::as_refs)
            .ok_or(HeapError::HeapEmpty)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }
}

impl<V, P: RadixKey> MeldableHeap<V, P> for RadixHeap<V, P> {
    /// Merges `other` into this heap
    ///
    /// The smaller of the two baselines becomes the baseline of the result and
    /// every entry of the heap with the larger baseline is re-pushed.
    fn merge(&mut self, mut other: Self) -> Result<()> {
        if other.last < self.last {
            std::mem::swap(self, &mut other);
        }
        trace!(moved = other.len, "merging radix heaps");
        for bucket in other.buckets {
            for entry in bucket {
                self.insert(entry);
            }
        }
        Ok(())
    }

    fn take(&mut self) -> Self {
        let mut empty = Self::new();
        empty.last = self.last;
        std::mem::replace(self, empty)
    }
}

impl<V, P: RadixKey> Default for RadixHeap<V, P> {
    fn default() -> Self {
        Self::new()
    }
}
