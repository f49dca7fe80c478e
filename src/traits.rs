//! Common traits for heap data structures
//!
//! This module provides the contract every engine in this crate implements:
//!
//! - [`Heap`]: push, pop, peek and the bookkeeping operations shared by all engines
//! - [`MeldableHeap`]: combining two heaps of the same type
//! - [`TrackedHeap`]: ID-addressed access, update and removal of live elements
//! - [`IndexedHeap`]: index-addressed access for array engines, plus swap callbacks
//! - [`MeldTree`]: the seam between a tree engine and the ID tracking layer
//!
//! Ordering is never taken from `Ord` directly. Every engine is constructed with a
//! [`Comparator`] that decides which of two priorities should be extracted first.

use crate::arena::{NodeRef, Remap};
use crate::callback::CallbackHandle;
use crate::compare::Comparator;
use thiserror::Error;

/// Error type for heap operations
///
/// Every variant is an expected, recoverable condition. None of them leave the
/// heap in a partially modified state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeapError {
    /// `pop`/`peek` (or a projection of them) on a heap with no elements
    #[error("heap is empty")]
    HeapEmpty,
    /// An array locator does not address a live slot
    #[error("index {index} is out of bounds for a heap of length {len}")]
    IndexOutOfBounds {
        /// The rejected index
        index: usize,
        /// Length of the heap at the time of the call
        len: usize,
    },
    /// No live node is registered under the given ID
    #[error("no node is registered under the given id")]
    NodeNotFound,
    /// No callback is registered under the given handle
    #[error("no callback is registered under the given handle")]
    CallbackNotFound,
    /// A radix heap received a priority below its current baseline
    #[error("priority is below the heap's current baseline")]
    PriorityBelowBaseline,
    /// An explicit rebalance was requested while bucket 0 still holds elements
    #[error("bucket 0 is not empty, no rebalancing needed")]
    RebalanceNotNeeded,
    /// The ID generator produced an ID that is still registered
    #[error("id generator produced an id that is already registered")]
    IdGenerationCollision,
}

/// Result alias used throughout the crate
pub type Result<T, E = HeapError> = std::result::Result<T, E>;

/// Base trait for heap/priority queue data structures
///
/// Heaps store `(value, priority)` pairs. The element whose priority the
/// comparator says should be extracted first sits at the top.
///
/// # Example
///
/// ```rust
/// use meldheap::{DaryHeap, Heap, MinOrder};
///
/// let mut heap = DaryHeap::binary(MinOrder);
/// heap.push("three", 3).unwrap();
/// heap.push("one", 1).unwrap();
/// heap.push("two", 2).unwrap();
///
/// assert_eq!(heap.peek(), Ok((&"one", &1)));
/// assert_eq!(heap.pop(), Ok(("one", 1)));
/// assert_eq!(heap.pop_priority(), Ok(2));
/// ```
pub trait Heap<V, P> {
    /// What `push` hands back: `()` for untracked engines, the element's ID for
    /// tracked ones.
    type Handle;

    /// Inserts `value` with the given `priority`
    ///
    /// # Errors
    /// Radix heaps reject priorities below their baseline; tracked heaps reject
    /// an ID the generator produced twice while it is still registered.
    fn push(&mut self, value: V, priority: P) -> Result<Self::Handle>;

    /// Removes and returns the top element
    ///
    /// # Errors
    /// Returns [`HeapError::HeapEmpty`] when there is nothing to pop.
    fn pop(&mut self) -> Result<(V, P)>;

    /// Returns the top element without removing it
    ///
    /// # Errors
    /// Returns [`HeapError::HeapEmpty`] when there is nothing to peek at.
    fn peek(&self) -> Result<(&V, &P)>;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Removes every element, retiring all nodes
    fn clear(&mut self);

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// [`pop`](Heap::pop), keeping only the value
    fn pop_value(&mut self) -> Result<V> {
        self.pop().map(|(value, _)| value)
    }

    /// [`pop`](Heap::pop), keeping only the priority
    fn pop_priority(&mut self) -> Result<P> {
        self.pop().map(|(_, priority)| priority)
    }

    /// [`peek`](Heap::peek), keeping only the value
    fn peek_value<'a>(&'a self) -> Result<&'a V>
    where
        P: 'a,
    {
        self.peek().map(|(value, _)| value)
    }

    /// [`peek`](Heap::peek), keeping only the priority
    fn peek_priority<'a>(&'a self) -> Result<&'a P>
    where
        V: 'a,
    {
        self.peek().map(|(_, priority)| priority)
    }

    /// Drains the heap in extraction order
    fn into_sorted_vec(mut self) -> Vec<(V, P)>
    where
        Self: Sized,
    {
        let mut out = Vec::with_capacity(self.len());
        while let Ok(entry) = self.pop() {
            out.push(entry);
        }
        out
    }
}

/// Heaps that can absorb another heap of the same type
pub trait MeldableHeap<V, P>: Heap<V, P> {
    /// Merges `other` into this heap, consuming it
    ///
    /// # Errors
    /// Tracked heaps refuse to merge when both sides hold the same ID; the
    /// receiving heap is left untouched in that case.
    ///
    /// # Time Complexity
    /// The meld itself is O(log n); relocating the other heap's nodes into this
    /// heap's arena is linear in the size of `other`.
    fn merge(&mut self, other: Self) -> Result<()>
    where
        Self: Sized;

    /// Reports whether [`merge`](MeldableHeap::merge) would accept `other`,
    /// without consuming it
    fn check_merge(&self, other: &Self) -> Result<()>
    where
        Self: Sized,
    {
        let _ = other;
        Ok(())
    }

    /// Moves every element out into a new heap with the same configuration,
    /// leaving this one empty
    fn take(&mut self) -> Self
    where
        Self: Sized;
}

/// Heaps whose elements can be addressed by the ID returned from `push`
///
/// # Example
///
/// ```rust
/// use meldheap::{Heap, MinOrder, TrackedHeap, TrackedPairingHeap};
///
/// let mut heap: TrackedPairingHeap<&str, i32, MinOrder> = TrackedPairingHeap::new(MinOrder);
/// let id = heap.push("item", 10).unwrap();
/// heap.push("other", 7).unwrap();
/// heap.update_priority(&id, 5).unwrap();
/// assert_eq!(heap.peek(), Ok((&"item", &5)));
/// ```
pub trait TrackedHeap<V, P>: Heap<V, P> {
    /// Returns the element registered under `id`
    ///
    /// # Errors
    /// [`HeapError::NodeNotFound`] if `id` is unknown or was already removed.
    fn get(&self, id: &Self::Handle) -> Result<(&V, &P)>;

    /// Returns true if `id` addresses a live element
    fn contains(&self, id: &Self::Handle) -> bool {
        self.get(id).is_ok()
    }

    /// Replaces the value of a live element; the structure is not touched
    fn update_value(&mut self, id: &Self::Handle, value: V) -> Result<()>;

    /// Replaces the priority of a live element and restores heap order
    fn update_priority(&mut self, id: &Self::Handle, priority: P) -> Result<()>;

    /// Removes a live element from anywhere in the heap
    fn remove(&mut self, id: &Self::Handle) -> Result<(V, P)>;

    /// Replaces both value and priority of a live element
    fn update(&mut self, id: &Self::Handle, value: V, priority: P) -> Result<()> {
        self.update_value(id, value)?;
        self.update_priority(id, priority)
    }

    /// [`get`](TrackedHeap::get), keeping only the value
    fn get_value<'a>(&'a self, id: &Self::Handle) -> Result<&'a V>
    where
        P: 'a,
    {
        self.get(id).map(|(value, _)| value)
    }

    /// [`get`](TrackedHeap::get), keeping only the priority
    fn get_priority<'a>(&'a self, id: &Self::Handle) -> Result<&'a P>
    where
        V: 'a,
    {
        self.get(id).map(|(_, priority)| priority)
    }
}

/// Array heaps, whose elements are addressed by their current index
///
/// Indices are invalidated by every mutating operation. Register a swap
/// callback to follow an element as it moves.
pub trait IndexedHeap<V, P>: Heap<V, P> {
    /// Returns the element currently stored at `index`
    fn get(&self, index: usize) -> Result<(&V, &P)>;

    /// Overwrites the element at `index` and repairs heap order in whichever
    /// direction is needed
    fn update(&mut self, index: usize, value: V, priority: P) -> Result<()>;

    /// Removes the element at `index`
    fn remove(&mut self, index: usize) -> Result<(V, P)>;

    /// Registers a callback invoked with both indices of every swap
    fn register<F>(&mut self, callback: F) -> CallbackHandle
    where
        F: FnMut(usize, usize) + Send + Sync + 'static;

    /// Removes a previously registered callback
    ///
    /// # Errors
    /// [`HeapError::CallbackNotFound`] for an unknown or already removed handle.
    fn deregister(&mut self, handle: CallbackHandle) -> Result<()>;
}

/// A heap-ordered tree assembled purely by melding, stored in an arena
///
/// This is the interface the [`Tracked`](crate::tracked::Tracked) layer drives.
/// Each node carries a `Tag`: `()` for untracked heaps, the element ID for
/// tracked ones, so that extraction reports which ID left the heap.
pub trait MeldTree: Sized {
    /// Stored value type
    type Value;
    /// Priority type
    type Priority;
    /// Per-node tag
    type Tag;
    /// Ordering used by this tree
    type Cmp: Comparator<Self::Priority>;

    /// Where retired node shells go; see [`Pool`](crate::Pool)
    type NodePool;

    /// Creates an empty tree drawing node shells from `pool`
    fn empty_with(cmp: Self::Cmp, pool: Self::NodePool) -> Self;

    /// Number of live nodes
    fn node_count(&self) -> usize;

    /// Inserts a singleton node and melds it with the root
    fn insert_tagged(&mut self, value: Self::Value, priority: Self::Priority, tag: Self::Tag)
        -> NodeRef;

    /// The root entry, if any
    fn root_entry(&self) -> Option<(&Self::Value, &Self::Priority)>;

    /// Removes the root, melding its children into the new root
    fn pop_root(&mut self) -> Option<(Self::Value, Self::Priority, Self::Tag)>;

    /// The entry stored at a live node
    fn entry(&self, node: NodeRef) -> (&Self::Value, &Self::Priority);

    /// Mutable access to a live node's value
    fn value_mut(&mut self, node: NodeRef) -> &mut Self::Value;

    /// Detaches `node`, assigns `priority` and melds it back into the root
    fn reprioritize(&mut self, node: NodeRef, priority: Self::Priority);

    /// Detaches `node` and retires it
    fn extract(&mut self, node: NodeRef) -> (Self::Value, Self::Priority, Self::Tag);

    /// Retires every node
    fn clear_nodes(&mut self);

    /// Moves every node of `other` into this tree's arena and melds the roots
    fn absorb(&mut self, other: Self) -> Remap;

    /// A compacted, independent copy of this tree
    fn duplicate(&self) -> (Self, Remap)
    where
        Self::Value: Clone,
        Self::Priority: Clone,
        Self::Tag: Clone;

    /// An empty tree with the same comparator and a pool forked from this one's
    fn empty_like(&self) -> Self;
}
