//! Pairing Heap implementation
//!
//! A pairing heap is a heap-ordered multi-way tree built purely by melding:
//! - O(1) insert and merge (plus arena relocation for merge)
//! - O(log n) amortized pop
//! - o(log n) amortized decrease-key
//!
//! Two trees meld by making the root that should not be extracted first the
//! new first child of the other root. Popping the root consolidates its child
//! list with the classic two-pass scheme: meld siblings pairwise left to
//! right, then fold the results together right to left.
//!
//! Children form a doubly linked sibling list. A node's `prev` link points at
//! its previous sibling, or at its parent if it is the first child, which is
//! all that is needed to cut a node out of the middle of the tree in O(1).
//!
//! # Example
//!
//! ```rust
//! use meldheap::{Heap, MeldableHeap, MinOrder, PairingHeap};
//!
//! let mut heap = PairingHeap::new(MinOrder);
//! heap.push("five", 5).unwrap();
//! heap.push("three", 3).unwrap();
//!
//! let mut other = PairingHeap::new(MinOrder);
//! other.push("one", 1).unwrap();
//!
//! heap.merge(other).unwrap();
//! assert_eq!(heap.pop(), Ok(("one", 1)));
//! assert_eq!(heap.pop(), Ok(("three", 3)));
//! ```

use crate::arena::{Arena, Link, NodeRef, Relink, Remap, Shell};
use crate::compare::Comparator;
use crate::entry::Entry;
use crate::pool::{LocalPool, Pool};
use crate::traits::{Heap, HeapError, MeldTree, MeldableHeap, Result};
use smallvec::SmallVec;
use std::fmt;
use tracing::trace;

/// A pairing heap node
///
/// Opaque; it is only public so that pool types can be spelled out, see
/// [`NodeShell`].
#[derive(Debug, Clone)]
pub struct Node<V, P, K> {
    entry: Entry<V, P>,
    tag: K,
    child: Link,
    next: Link,
    /// Previous sibling, or the parent for a first child. `None` for the root.
    prev: Link,
}

impl<V, P, K> Node<V, P, K> {
    fn singleton(entry: Entry<V, P>, tag: K) -> Self {
        Self {
            entry,
            tag,
            child: None,
            next: None,
            prev: None,
        }
    }
}

impl<V, P, K> Relink for Node<V, P, K> {
    fn relink<F: Fn(NodeRef) -> NodeRef>(&mut self, map: F) {
        self.child = self.child.map(&map);
        self.next = self.next.map(&map);
        self.prev = self.prev.map(&map);
    }
}

/// The allocation a pairing heap node lives in; what pools hand out
pub type NodeShell<V, P, K = ()> = Shell<Node<V, P, K>>;

/// Pairing Heap
///
/// `K` is the per-node tag; it is `()` for this untracked form. See
/// [`TrackedPairingHeap`](crate::TrackedPairingHeap) for ID-addressed access.
/// `Pl` is the [`Pool`] retired node shells go to.
pub struct PairingHeap<V, P, C, K = (), Pl = LocalPool<NodeShell<V, P, K>>> {
    arena: Arena<Node<V, P, K>, Pl>,
    root: Link,
    cmp: C,
}

impl<V, P, C: Comparator<P>> PairingHeap<V, P, C> {
    /// Creates an empty heap ordered by `cmp`, recycling retired nodes
    pub fn new(cmp: C) -> Self {
        Self::with_pool(cmp, LocalPool::new())
    }
}

impl<V, P, C: Comparator<P>, Pl: Pool<NodeShell<V, P>>> PairingHeap<V, P, C, (), Pl> {
    /// Creates an empty heap that takes node shells from `pool`
    pub fn with_pool(cmp: C, pool: Pl) -> Self {
        Self::empty(cmp, pool)
    }
}

impl<V, P, C: Comparator<P>, K, Pl: Pool<NodeShell<V, P, K>>> PairingHeap<V, P, C, K, Pl> {
    fn empty(cmp: C, pool: Pl) -> Self {
        Self {
            arena: Arena::new(pool),
            root: None,
            cmp,
        }
    }

    /// The comparator this heap orders by
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// The pool retired node shells go to
    pub fn pool(&self) -> &Pl {
        self.arena.pool()
    }

    #[inline]
    fn precedes(&self, a: NodeRef, b: NodeRef) -> bool {
        self.cmp
            .precedes(&self.arena[a].entry.priority, &self.arena[b].entry.priority)
    }

    /// Links two detached roots, returning the surviving root
    fn link(&mut self, a: NodeRef, b: NodeRef) -> NodeRef {
        let (winner, loser) = if self.precedes(b, a) { (b, a) } else { (a, b) };
        let first = self.arena[winner].child;
        {
            let node = &mut self.arena[loser];
            node.next = first;
            node.prev = Some(winner);
        }
        if let Some(first) = first {
            self.arena[first].prev = Some(loser);
        }
        self.arena[winner].child = Some(loser);
        winner
    }

    fn meld(&mut self, a: Link, b: Link) -> Link {
        match (a, b) {
            (None, b) => b,
            (a, None) => a,
            (Some(a), Some(b)) => Some(self.link(a, b)),
        }
    }

    /// Two-pass consolidation of the sibling list starting at `first`
    fn combine_siblings(&mut self, first: NodeRef) -> NodeRef {
        let mut pairs: SmallVec<[NodeRef; 32]> = SmallVec::new();
        let mut current = Some(first);

        // First pass: meld adjacent siblings left to right.
        while let Some(a) = current {
            let b = self.arena[a].next;
            self.isolate(a);
            match b {
                Some(b) => {
                    current = self.arena[b].next;
                    self.isolate(b);
                    pairs.push(self.link(a, b));
                }
                None => {
                    pairs.push(a);
                    current = None;
                }
            }
        }

        // Second pass: fold right to left.
        let mut result = match pairs.pop() {
            Some(last) => last,
            None => return first,
        };
        while let Some(pair) = pairs.pop() {
            result = self.link(pair, result);
        }
        result
    }

    #[inline]
    fn isolate(&mut self, node: NodeRef) {
        let node = &mut self.arena[node];
        node.next = None;
        node.prev = None;
    }

    /// Cuts a non-root node, together with its subtree, out of its sibling list
    fn unlink(&mut self, node: NodeRef) {
        let (prev, next) = {
            let n = &self.arena[node];
            (n.prev, n.next)
        };
        if let Some(prev) = prev {
            if self.arena[prev].child == Some(node) {
                self.arena[prev].child = next;
            } else {
                self.arena[prev].next = next;
            }
        }
        if let Some(next) = next {
            self.arena[next].prev = prev;
        }
        self.isolate(node);
    }

    /// Removes `node` from the tree entirely, leaving it childless and
    /// unlinked while the rest of the heap stays well-formed
    fn detach(&mut self, node: NodeRef) {
        if self.root != Some(node) {
            self.unlink(node);
        }
        let child = self.arena[node].child.take();
        let rest = match child {
            Some(child) => Some(self.combine_siblings(child)),
            None => None,
        };
        if self.root == Some(node) {
            self.root = rest;
        } else {
            self.root = self.meld(self.root, rest);
        }
    }

    fn insert_node(&mut self, entry: Entry<V, P>, tag: K) -> NodeRef {
        let node = self.arena.alloc(Node::singleton(entry, tag));
        self.root = self.meld(self.root, Some(node));
        node
    }

    fn retire(&mut self, node: NodeRef) -> (V, P, K) {
        self.detach(node);
        let Node { entry, tag, .. } = self.arena.free(node);
        let (value, priority) = entry.into_parts();
        (value, priority, tag)
    }

    fn set_priority(&mut self, node: NodeRef, priority: P) {
        // A node whose priority does not get worse keeps its subtree: every
        // child was already no better than the old priority.
        let keeps_subtree = !self.cmp.precedes(&self.arena[node].entry.priority, &priority);
        if !keeps_subtree {
            self.detach(node);
            self.arena[node].entry.priority = priority;
            self.root = self.meld(self.root, Some(node));
        } else if self.root == Some(node) {
            self.arena[node].entry.priority = priority;
        } else {
            self.unlink(node);
            self.arena[node].entry.priority = priority;
            self.root = self.meld(self.root, Some(node));
        }
    }

    /// Checks heap order and the consistency of every sibling and parent link
    ///
    /// This walks the whole tree; it is meant for tests and debugging.
    pub fn verify_internal_structure(&self) -> bool {
        let Some(root) = self.root else {
            return self.arena.is_empty();
        };
        if self.arena[root].prev.is_some() || self.arena[root].next.is_some() {
            return false;
        }
        let mut seen = 0usize;
        let mut stack = vec![root];
        while let Some(parent) = stack.pop() {
            seen += 1;
            let mut prev = parent;
            let mut child = self.arena[parent].child;
            while let Some(c) = child {
                if self.arena[c].prev != Some(prev) || self.precedes(c, parent) {
                    return false;
                }
                stack.push(c);
                prev = c;
                child = self.arena[c].next;
            }
        }
        seen == self.arena.len()
    }
}

impl<V, P, C: Comparator<P>, Pl: Pool<NodeShell<V, P>>> Heap<V, P> for PairingHeap<V, P, C, (), Pl> {
    type Handle = ();

    fn push(&mut self, value: V, priority: P) -> Result<()> {
        self.insert_node(Entry::new(value, priority), ());
        Ok(())
    }

    fn pop(&mut self) -> Result<(V, P)> {
        let root = self.root.ok_or(HeapError::HeapEmpty)?;
        let (value, priority, ()) = self.retire(root);
        Ok((value, priority))
    }

    fn peek(&self) -> Result<(&V, &P)> {
        self.root_entry().ok_or(HeapError::HeapEmpty)
    }

    fn len(&self) -> usize {
        self.arena.len()
    }

    fn clear(&mut self) {
        self.clear_nodes();
    }
}

impl<V, P, C: Comparator<P>, Pl: Pool<NodeShell<V, P>>> MeldableHeap<V, P>
    for PairingHeap<V, P, C, (), Pl>
{
    fn merge(&mut self, other: Self) -> Result<()> {
        self.absorb(other);
        Ok(())
    }

    fn take(&mut self) -> Self {
        let empty = self.empty_like();
        std::mem::replace(self, empty)
    }
}

impl<V, P, C: Comparator<P>, K, Pl: Pool<NodeShell<V, P, K>>> MeldTree
    for PairingHeap<V, P, C, K, Pl>
{
    type Value = V;
    type Priority = P;
    type Tag = K;
    type Cmp = C;
    type NodePool = Pl;

    fn empty_with(cmp: C, pool: Pl) -> Self {
        Self::empty(cmp, pool)
    }

    fn node_count(&self) -> usize {
        self.arena.len()
    }

    fn insert_tagged(&mut self, value: V, priority: P, tag: K) -> NodeRef {
        self.insert_node(Entry::new(value, priority), tag)
    }

    fn root_entry(&self) -> Option<(&V, &P)> {
        self.root.map(|root| self.arena[root].entry.as_refs())
    }

    fn pop_root(&mut self) -> Option<(V, P, K)> {
        let root = self.root?;
        Some(self.retire(root))
    }

    fn entry(&self, node: NodeRef) -> (&V, &P) {
        self.arena[node].entry.as_refs()
    }

    fn value_mut(&mut self, node: NodeRef) -> &mut V {
        &mut self.arena[node].entry.value
    }

    fn reprioritize(&mut self, node: NodeRef, priority: P) {
        self.set_priority(node, priority);
    }

    fn extract(&mut self, node: NodeRef) -> (V, P, K) {
        self.retire(node)
    }

    fn clear_nodes(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    fn absorb(&mut self, other: Self) -> Remap {
        trace!(left = self.arena.len(), right = other.arena.len(), "melding pairing heaps");
        let remap = self.arena.absorb(other.arena);
        let other_root = remap.link(other.root);
        self.root = self.meld(self.root, other_root);
        remap
    }

    fn duplicate(&self) -> (Self, Remap)
    where
        V: Clone,
        P: Clone,
        K: Clone,
    {
        let (arena, remap) = self.arena.compacted();
        let copy = Self {
            arena,
            root: remap.link(self.root),
            cmp: self.cmp.clone(),
        };
        (copy, remap)
    }

    fn empty_like(&self) -> Self {
        Self {
            arena: self.arena.empty_like(),
            root: None,
            cmp: self.cmp.clone(),
        }
    }
}

impl<V, P, C, K, Pl> Clone for PairingHeap<V, P, C, K, Pl>
where
    V: Clone,
    P: Clone,
    C: Comparator<P>,
    K: Clone,
    Pl: Pool<NodeShell<V, P, K>>,
{
    fn clone(&self) -> Self {
        self.duplicate().0
    }
}

impl<V, P, C, K, Pl> fmt::Debug for PairingHeap<V, P, C, K, Pl>
where
    V: fmt::Debug,
    P: fmt::Debug,
    C: Comparator<P>,
    Pl: Pool<NodeShell<V, P, K>>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairingHeap")
            .field("len", &self.arena.len())
            .field("top", &self.root_entry())
            .finish()
    }
}
