//! Meldable Priority Queues for Rust
//!
//! This crate provides several interchangeable heap engines behind one set of
//! traits. Every engine stores `(value, priority)` pairs and is ordered by a
//! [`Comparator`] supplied at construction, so the same engine serves as a
//! min-heap, a max-heap or anything in between.
//!
//! # Engines
//!
//! - **D-ary Heap**: array heap with a configurable branching factor; binary heap for d = 2.
//!   Index-addressed update/remove with swap callbacks.
//! - **Pairing Heap**: O(1) insert and merge; O(log n) amortized pop; o(log n) amortized decrease-key
//! - **Skew Heap**: self-adjusting binary tree; O(log n) amortized insert, pop and merge
//! - **Leftist Heap**: rank-balanced binary tree; O(log n) worst-case insert, pop and merge
//! - **Radix Heap**: monotone bucketed heap for unsigned integer priorities
//!
//! The three tree engines come in an untracked form ([`PairingHeap`],
//! [`SkewHeap`], [`LeftistHeap`]) and a tracked form ([`TrackedPairingHeap`],
//! [`TrackedSkewHeap`], [`TrackedLeftistHeap`]) whose `push` returns an ID for
//! later update and removal. Any engine can be shared between threads by
//! wrapping it in a [`SyncHeap`].
//!
//! # Example
//!
//! ```rust
//! use meldheap::{Heap, MaxOrder, MinOrder, TrackedHeap, TrackedPairingHeap};
//!
//! let mut heap: TrackedPairingHeap<&str, u32, MinOrder> = TrackedPairingHeap::new(MinOrder);
//! let a = heap.push("item1", 5).unwrap();
//! heap.push("item2", 3).unwrap();
//! heap.update_priority(&a, 1).unwrap();
//! assert_eq!(heap.peek(), Ok((&"item1", &1)));
//!
//! let mut max = meldheap::DaryHeap::binary(MaxOrder);
//! max.push('a', 1).unwrap();
//! max.push('b', 9).unwrap();
//! assert_eq!(max.pop(), Ok(('b', 9)));
//! ```

pub mod arena;
pub mod callback;
pub mod compare;
pub mod dary;
pub mod entry;
pub mod id;
pub mod leftist;
pub mod pairing;
pub mod pool;
pub mod radix;
pub mod rank;
pub mod skew;
pub mod sync;
pub mod tracked;
pub mod traits;

pub use callback::{CallbackHandle, CallbackRegistry};
pub use compare::{Comparator, MaxOrder, MinOrder};
pub use dary::DaryHeap;
pub use entry::Entry;
#[cfg(feature = "unique-ids")]
pub use id::UniqueIds;
pub use id::{IdGenerator, SequentialIds};
pub use leftist::LeftistHeap;
pub use pairing::PairingHeap;
pub use pool::{AllocPool, LocalPool, Pool, ReusePool};
pub use radix::{RadixHeap, RadixKey};
pub use skew::SkewHeap;
pub use sync::SyncHeap;
pub use tracked::{Tracked, TrackedLeftistHeap, TrackedPairingHeap, TrackedSkewHeap};
pub use traits::{Heap, HeapError, IndexedHeap, MeldTree, MeldableHeap, Result, TrackedHeap};
