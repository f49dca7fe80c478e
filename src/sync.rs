//! Thread-safe wrapper around any heap engine
//!
//! [`SyncHeap`] puts a single engine behind a `parking_lot` reader/writer lock.
//! Mutating calls take the write lock for their whole duration, read-only
//! calls take the read lock, so readers run concurrently with each other and
//! never observe a half-finished mutation. Reads hand out clones, because a
//! reference into the engine cannot outlive the guard.
//!
//! Engines know nothing about this type; wrap whichever one fits.
//!
//! # Example
//!
//! ```rust
//! use meldheap::{DaryHeap, MinOrder, SyncHeap};
//! use std::thread;
//!
//! let heap = SyncHeap::new(DaryHeap::binary(MinOrder));
//! thread::scope(|s| {
//!     for t in 0..4 {
//!         let heap = &heap;
//!         s.spawn(move || {
//!             for i in 0..100 {
//!                 heap.push(t, i).unwrap();
//!             }
//!         });
//!     }
//! });
//! assert_eq!(heap.len(), 400);
//! assert_eq!(heap.peek_priority(), Ok(0));
//! ```

use crate::callback::CallbackHandle;
use crate::traits::{Heap, IndexedHeap, MeldableHeap, Result, TrackedHeap};
use parking_lot::RwLock;
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;

/// A heap engine guarded by a reader/writer lock
pub struct SyncHeap<V, P, H> {
    inner: RwLock<H>,
    _entries: PhantomData<fn() -> (V, P)>,
}

impl<V, P, H: Heap<V, P>> SyncHeap<V, P, H> {
    /// Wraps `heap`
    pub fn new(heap: H) -> Self {
        SyncHeap {
            inner: RwLock::new(heap),
            _entries: PhantomData,
        }
    }

    /// Unwraps the engine
    pub fn into_inner(self) -> H {
        self.inner.into_inner()
    }

    /// Runs `f` with shared access to the engine
    pub fn with_read<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` with exclusive access to the engine
    ///
    /// Use this to make a sequence of operations atomic.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Inserts an element under the write lock
    pub fn push(&self, value: V, priority: P) -> Result<H::Handle> {
        self.inner.write().push(value, priority)
    }

    /// Removes and returns the top element
    pub fn pop(&self) -> Result<(V, P)> {
        self.inner.write().pop()
    }

    /// Removes the top element, returning its value
    pub fn pop_value(&self) -> Result<V> {
        self.inner.write().pop_value()
    }

    /// Removes the top element, returning its priority
    pub fn pop_priority(&self) -> Result<P> {
        self.inner.write().pop_priority()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether the heap holds no elements
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Removes every element
    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

impl<V: Clone, P: Clone, H: Heap<V, P>> SyncHeap<V, P, H> {
    /// A copy of the top element
    pub fn peek(&self) -> Result<(V, P)> {
        let heap = self.inner.read();
        heap.peek().map(|(v, p)| (v.clone(), p.clone()))
    }

    /// A copy of the top element's value
    pub fn peek_value(&self) -> Result<V> {
        self.inner.read().peek_value().cloned()
    }

    /// A copy of the top element's priority
    pub fn peek_priority(&self) -> Result<P> {
        self.inner.read().peek_priority().cloned()
    }
}

impl<V, P, H: TrackedHeap<V, P>> SyncHeap<V, P, H> {
    /// A copy of the element registered under `id`
    pub fn get(&self, id: &H::Handle) -> Result<(V, P)>
    where
        V: Clone,
        P: Clone,
    {
        let heap = self.inner.read();
        heap.get(id).map(|(v, p)| (v.clone(), p.clone()))
    }

    /// Whether `id` names a live element
    pub fn contains(&self, id: &H::Handle) -> bool {
        self.inner.read().contains(id)
    }

    /// Replaces both value and priority of the element registered under `id`
    pub fn update(&self, id: &H::Handle, value: V, priority: P) -> Result<()> {
        self.inner.write().update(id, value, priority)
    }

    /// Replaces the value of the element registered under `id`
    pub fn update_value(&self, id: &H::Handle, value: V) -> Result<()> {
        self.inner.write().update_value(id, value)
    }

    /// Moves the element registered under `id` to a new priority
    pub fn update_priority(&self, id: &H::Handle, priority: P) -> Result<()> {
        self.inner.write().update_priority(id, priority)
    }

    /// Removes the element registered under `id`
    pub fn remove(&self, id: &H::Handle) -> Result<(V, P)> {
        self.inner.write().remove(id)
    }
}

impl<V, P, H: IndexedHeap<V, P>> SyncHeap<V, P, H> {
    /// A copy of the element currently stored at `index`
    pub fn get_at(&self, index: usize) -> Result<(V, P)>
    where
        V: Clone,
        P: Clone,
    {
        let heap = self.inner.read();
        heap.get(index).map(|(v, p)| (v.clone(), p.clone()))
    }

    /// Replaces the element stored at `index`, restoring heap order
    pub fn update_at(&self, index: usize, value: V, priority: P) -> Result<()> {
        self.inner.write().update(index, value, priority)
    }

    /// Removes the element stored at `index`
    pub fn remove_at(&self, index: usize) -> Result<(V, P)> {
        self.inner.write().remove(index)
    }

    /// Adds a callback told about every position swap
    pub fn register<F>(&self, callback: F) -> CallbackHandle
    where
        F: FnMut(usize, usize) + Send + Sync + 'static,
    {
        self.inner.write().register(callback)
    }

    /// Removes a callback added with [`register`](Self::register)
    pub fn deregister(&self, handle: CallbackHandle) -> Result<()> {
        self.inner.write().deregister(handle)
    }
}

impl<V, P, H: MeldableHeap<V, P>> SyncHeap<V, P, H> {
    /// Merges an unshared heap into this one
    pub fn merge(&self, other: H) -> Result<()> {
        self.inner.write().merge(other)
    }

    /// Moves every element of `other` into this heap
    ///
    /// Both write locks are held for the duration. They are acquired in
    /// address order, so two threads merging a pair of heaps into each other
    /// cannot deadlock. Merging a heap into itself does nothing.
    ///
    /// # Errors
    /// Whatever [`MeldableHeap::check_merge`] reports; both heaps are left
    /// untouched in that case.
    pub fn merge_from(&self, other: &Self) -> Result<()> {
        if std::ptr::eq(self, other) {
            return Ok(());
        }
        let (mut mine, mut theirs) = if (self as *const Self) < (other as *const Self) {
            let mine = self.inner.write();
            (mine, other.inner.write())
        } else {
            let theirs = other.inner.write();
            (self.inner.write(), theirs)
        };
        mine.check_merge(&theirs)?;
        let taken = theirs.take();
        debug!(moved = taken.len(), "merging locked heaps");
        mine.merge(taken)
    }
}

impl<V, P, H: Heap<V, P> + Default> Default for SyncHeap<V, P, H> {
    fn default() -> Self {
        Self::new(H::default())
    }
}

impl<V, P, H: fmt::Debug> fmt::Debug for SyncHeap<V, P, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncHeap").field("inner", &self.inner).finish()
    }
}
