//! D-ary Heap implementation
//!
//! An array heap with a fixed branching factor chosen at construction. The
//! classic binary heap is the `d = 2` case ([`DaryHeap::binary`]).
//!
//! Elements live in a dense vector; the children of index `i` are
//! `d * i + 1 ..= d * i + d` and its parent is `(i - 1) / d`. An element's
//! identity is its current index, which every mutating operation may change.
//! Callers that need to follow an element register a swap callback: it is
//! invoked with both indices of every exchange performed by the heap.
//!
//! # Time Complexity
//!
//! | Operation      | Complexity     |
//! |----------------|----------------|
//! | `push`         | O(log_d n)     |
//! | `pop`          | O(d log_d n)   |
//! | `peek`         | O(1)           |
//! | `update`       | O(d log_d n)   |
//! | `remove`       | O(d log_d n)   |
//! | `from_entries` | O(n)           |
//!
//! # Example
//!
//! ```rust
//! use meldheap::{DaryHeap, Heap, IndexedHeap, MinOrder};
//!
//! let mut heap = DaryHeap::from_entries(3, MinOrder, [("a", 4), ("b", 10), ("c", 3)]);
//! assert_eq!(heap.peek(), Ok((&"c", &3)));
//!
//! // Overwrite whatever sits at index 1
//! heap.update(1, "z", 0).unwrap();
//! assert_eq!(heap.pop(), Ok(("z", 0)));
//! ```

use crate::callback::{CallbackHandle, CallbackRegistry};
use crate::compare::Comparator;
use crate::entry::Entry;
use crate::traits::{Heap, HeapError, IndexedHeap, Result};
use std::fmt;

/// A d-ary heap ordered by a [`Comparator`]
pub struct DaryHeap<V, P, C> {
    data: Vec<Entry<V, P>>,
    arity: usize,
    cmp: C,
    callbacks: CallbackRegistry,
}

impl<V, P, C: Comparator<P>> DaryHeap<V, P, C> {
    /// Creates an empty heap with branching factor `arity`
    ///
    /// An arity below 2 is raised to 2.
    pub fn new(arity: usize, cmp: C) -> Self {
        Self::with_capacity(arity, 0, cmp)
    }

    /// Creates an empty binary heap
    pub fn binary(cmp: C) -> Self {
        Self::new(2, cmp)
    }

    /// Creates an empty heap with room for `capacity` elements
    pub fn with_capacity(arity: usize, capacity: usize, cmp: C) -> Self {
        DaryHeap {
            data: Vec::with_capacity(capacity),
            arity: arity.max(2),
            cmp,
            callbacks: CallbackRegistry::new(),
        }
    }

    /// Builds a heap from `(value, priority)` pairs in linear time
    pub fn from_entries<I>(arity: usize, cmp: C, entries: I) -> Self
    where
        I: IntoIterator<Item = (V, P)>,
    {
        let mut heap = Self::new(arity, cmp);
        heap.data.extend(entries.into_iter().map(Entry::from));
        if heap.data.len() > 1 {
            let last_parent = (heap.data.len() - 2) / heap.arity;
            for i in (0..=last_parent).rev() {
                heap.sift_down(i);
            }
        }
        heap
    }

    /// Branching factor of this heap
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// The comparator ordering this heap
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Iterates over the elements in storage (index) order
    pub fn iter(&self) -> impl Iterator<Item = (&V, &P)> {
        self.data.iter().map(Entry::as_refs)
    }

    /// Pushes an element and pops the top in one step
    ///
    /// Returns the pushed element itself when nothing in the heap should be
    /// extracted before it.
    pub fn push_pop(&mut self, value: V, priority: P) -> (V, P) {
        let top_first = self
            .data
            .first()
            .is_some_and(|top| self.cmp.precedes(&top.priority, &priority));
        if !top_first {
            return (value, priority);
        }
        let old = std::mem::replace(&mut self.data[0], Entry::new(value, priority));
        self.sift_down(0);
        old.into_parts()
    }

    /// Pops the top and pushes a new element in one step
    ///
    /// # Errors
    /// [`HeapError::HeapEmpty`] if there is no top to replace; the new element
    /// is not inserted in that case.
    pub fn pop_push(&mut self, value: V, priority: P) -> Result<(V, P)> {
        let top = self.data.first_mut().ok_or(HeapError::HeapEmpty)?;
        let old = std::mem::replace(top, Entry::new(value, priority));
        self.sift_down(0);
        Ok(old.into_parts())
    }

    #[inline]
    fn precedes(&self, a: usize, b: usize) -> bool {
        self.cmp.precedes(&self.data[a].priority, &self.data[b].priority)
    }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.data.len() {
            Ok(())
        } else {
            Err(HeapError::IndexOutOfBounds {
                index,
                len: self.data.len(),
            })
        }
    }

    /// Exchanges two slots and reports the exchange to every callback
    fn swap(&mut self, i: usize, j: usize) {
        self.data.swap(i, j);
        self.callbacks.notify(i, j);
    }

    /// Move element at index up to maintain heap property
    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / self.arity;
            if self.precedes(index, parent) {
                self.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Move element at index down to maintain heap property
    fn sift_down(&mut self, mut index: usize) {
        let len = self.data.len();
        loop {
            let first = self.arity * index + 1;
            if first >= len {
                break;
            }
            let last = (first + self.arity).min(len);
            let mut best = first;
            for child in first + 1..last {
                if self.precedes(child, best) {
                    best = child;
                }
            }

            if self.precedes(best, index) {
                self.swap(index, best);
                index = best;
            } else {
                break;
            }
        }
    }

    /// Restores order around a slot whose entry was replaced
    fn repair(&mut self, index: usize) {
        if index > 0 && self.precedes(index, (index - 1) / self.arity) {
            self.sift_up(index);
        } else {
            self.sift_down(index);
        }
    }
}

impl<V, P, C: Comparator<P>> Heap<V, P> for DaryHeap<V, P, C> {
    type Handle = ();

    fn push(&mut self, value: V, priority: P) -> Result<()> {
        self.data.push(Entry::new(value, priority));
        self.sift_up(self.data.len() - 1);
        Ok(())
    }

    fn pop(&mut self) -> Result<(V, P)> {
        if self.data.is_empty() {
            return Err(HeapError::HeapEmpty);
        }
        self.remove(0)
    }

    fn peek(&self) -> Result<(&V, &P)> {
        self.data
            .first()
            .map(Entry::as_refs)
            .ok_or(HeapError::HeapEmpty)
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn clear(&mut self) {
        self.data.clear();
    }
}

impl<V, P, C: Comparator<P>> IndexedHeap<V, P> for DaryHeap<V, P, C> {
    fn get(&self, index: usize) -> Result<(&V, &P)> {
        self.check(index)?;
        Ok(self.data[index].as_refs())
    }

    fn update(&mut self, index: usize, value: V, priority: P) -> Result<()> {
        self.check(index)?;
        self.data[index] = Entry::new(value, priority);
        self.repair(index);
        Ok(())
    }

    fn remove(&mut self, index: usize) -> Result<(V, P)> {
        self.check(index)?;
        let last = self.data.len() - 1;
        if index != last {
            self.swap(index, last);
        }
        let removed = self.data.pop().ok_or(HeapError::HeapEmpty)?;
        if index < self.data.len() {
            // The moved-in element may belong above or below its new slot
            self.repair(index);
        }
        Ok(removed.into_parts())
    }

    fn register<F>(&mut self, callback: F) -> CallbackHandle
    where
        F: FnMut(usize, usize) + Send + Sync + 'static,
    {
        self.callbacks.register(callback)
    }

    fn deregister(&mut self, handle: CallbackHandle) -> Result<()> {
        self.callbacks.deregister(handle)
    }
}

/// Clones the elements only; the copy starts without callbacks.
impl<V: Clone, P: Clone, C: Comparator<P>> Clone for DaryHeap<V, P, C> {
    fn clone(&self) -> Self {
        DaryHeap {
            data: self.data.clone(),
            arity: self.arity,
            cmp: self.cmp.clone(),
            callbacks: CallbackRegistry::new(),
        }
    }
}

impl<V: fmt::Debug, P: fmt::Debug, C> fmt::Debug for DaryHeap<V, P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DaryHeap")
            .field("arity", &self.arity)
            .field("data", &self.data)
            .field("callbacks", &self.callbacks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{MaxOrder, MinOrder};
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn index_of<C: Comparator<i32>>(heap: &DaryHeap<i32, i32, C>, priority: i32) -> usize {
        heap.iter().position(|(_, p)| *p == priority).unwrap()
    }

    #[test]
    fn test_basic_operations() {
        let mut heap = DaryHeap::binary(MinOrder);

        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);

        heap.push("three", 3).unwrap();
        heap.push("one", 1).unwrap();
        heap.push("two", 2).unwrap();

        assert!(!heap.is_empty());
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.peek(), Ok((&"one", &1)));

        assert_eq!(heap.pop(), Ok(("one", 1)));
        assert_eq!(heap.pop(), Ok(("two", 2)));
        assert_eq!(heap.pop(), Ok(("three", 3)));
        assert_eq!(heap.pop(), Err(HeapError::HeapEmpty));
    }

    #[test]
    fn test_ternary_update_and_remove() {
        let mut heap = DaryHeap::from_entries(3, MinOrder, [4, 10, 3, 5, 1].map(|p| (p, p)));

        let i = index_of(&heap, 4);
        heap.update(i, 4, 0).unwrap();
        assert_eq!(heap.remove(0), Ok((4, 0)));
        assert_eq!(heap.peek_priority(), Ok(&1));

        let i = index_of(&heap, 5);
        assert_eq!(heap.remove(i), Ok((5, 5)));

        let drained: Vec<i32> = heap.into_sorted_vec().into_iter().map(|(_, p)| p).collect();
        assert_eq!(drained, vec![1, 3, 10]);
    }

    #[test]
    fn test_swap_callbacks() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let mut heap = DaryHeap::from_entries(3, MinOrder, [3, 1, 4, 2].map(|p| ((), p)));

        let sink = Arc::clone(&calls);
        let handle = heap.register(move |i, j| sink.lock().push((i, j)));
        heap.push((), 0).unwrap();
        assert!(!calls.lock().is_empty());

        heap.deregister(handle).unwrap();
        let seen = calls.lock().len();
        heap.push((), -1).unwrap();
        heap.pop().unwrap();
        assert_eq!(calls.lock().len(), seen);
        assert_eq!(heap.deregister(handle), Err(HeapError::CallbackNotFound));
    }

    #[test]
    fn test_callbacks_track_position() {
        // Follow the element pushed with priority 7 through every swap
        let tracked = Arc::new(Mutex::new(0usize));
        let mut heap = DaryHeap::new(4, MinOrder);
        heap.push('x', 7).unwrap();

        let pos = Arc::clone(&tracked);
        heap.register(move |i, j| {
            let mut pos = pos.lock();
            if *pos == i {
                *pos = j;
            } else if *pos == j {
                *pos = i;
            }
        });
        for p in [9, 3, 8, 1, 12, 5, 6] {
            heap.push('y', p).unwrap();
        }
        heap.pop().unwrap();
        heap.pop().unwrap();

        let at = *tracked.lock();
        assert_eq!(heap.get(at), Ok((&'x', &7)));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut heap = DaryHeap::binary(MinOrder);
        heap.push(1, 1).unwrap();
        let err = HeapError::IndexOutOfBounds { index: 3, len: 1 };
        assert_eq!(heap.get(3), Err(err.clone()));
        assert_eq!(heap.update(3, 0, 0), Err(err.clone()));
        assert_eq!(heap.remove(3), Err(err));
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn test_remove_repairs_upward() {
        // Removing a leaf from one subtree can pull in a smaller element
        // from another subtree that must travel up.
        let mut heap = DaryHeap::from_entries(2, MinOrder, [0, 10, 1, 11, 12, 2, 3].map(|p| (p, p)));
        let i = index_of(&heap, 11);
        heap.remove(i).unwrap();
        let drained: Vec<i32> = heap.into_sorted_vec().into_iter().map(|(_, p)| p).collect();
        assert_eq!(drained, vec![0, 1, 2, 3, 10, 12]);
    }

    #[test]
    fn test_push_pop_and_pop_push() {
        let mut heap = DaryHeap::binary(MinOrder);
        assert_eq!(heap.pop_push("a", 1), Err(HeapError::HeapEmpty));
        assert!(heap.is_empty());

        assert_eq!(heap.push_pop("a", 1), ("a", 1));
        assert!(heap.is_empty());

        heap.push("b", 5).unwrap();
        assert_eq!(heap.push_pop("c", 2), ("c", 2));
        assert_eq!(heap.push_pop("d", 9), ("b", 5));
        assert_eq!(heap.pop_push("e", 7), Ok(("d", 9)));
        assert_eq!(heap.peek(), Ok((&"e", &7)));
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn test_max_order_and_arity_clamp() {
        let mut heap = DaryHeap::new(0, MaxOrder);
        assert_eq!(heap.arity(), 2);
        for p in [3, 9, 1, 7] {
            heap.push(p, p).unwrap();
        }
        assert_eq!(heap.pop_priority(), Ok(9));
        assert_eq!(heap.pop_priority(), Ok(7));
    }

    #[test]
    fn test_clone_independent() {
        let mut heap = DaryHeap::new(5, MinOrder);
        for p in 0..20 {
            heap.push(p, p).unwrap();
        }
        let mut copy = heap.clone();
        copy.pop().unwrap();
        assert_eq!(heap.len(), 20);
        assert_eq!(copy.len(), 19);
        assert_eq!(heap.peek_priority(), Ok(&0));
        assert_eq!(copy.peek_priority(), Ok(&1));
    }

    #[test]
    fn test_duplicate_priorities() {
        let mut heap = DaryHeap::binary(MinOrder);

        heap.push("a", 1).unwrap();
        heap.push("b", 1).unwrap();
        heap.push("c", 1).unwrap();

        assert_eq!(heap.len(), 3);
        for _ in 0..3 {
            assert_eq!(heap.pop_priority(), Ok(1));
        }
    }
}
