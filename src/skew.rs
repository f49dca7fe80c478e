//! Skew Heap implementation
//!
//! A skew heap is a self-adjusting binary tree built purely by melding:
//! - O(log n) amortized insert, pop, merge and priority update
//! - no rank, size or balance bookkeeping at all
//!
//! Melding compares the two roots, keeps the winner as the root, melds the
//! loser into the winner's right subtree and then unconditionally swaps the
//! winner's children. That swap alone keeps right paths short on average.
//!
//! The meld here runs top-down in a loop rather than recursing, so a single
//! long right path cannot exhaust the stack.
//!
//! # Example
//!
//! ```rust
//! use meldheap::{Heap, MinOrder, SkewHeap};
//!
//! let mut heap = SkewHeap::new(MinOrder);
//! heap.push('b', 2).unwrap();
//! heap.push('a', 1).unwrap();
//! assert_eq!(heap.pop_value(), Ok('a'));
//! ```

use crate::arena::{Arena, Link, NodeRef, Relink, Remap, Shell};
use crate::compare::Comparator;
use crate::entry::Entry;
use crate::pool::{LocalPool, Pool};
use crate::traits::{Heap, HeapError, MeldTree, MeldableHeap, Result};
use std::fmt;
use tracing::trace;

/// A skew heap node
///
/// Opaque; it is only public so that pool types can be spelled out, see
/// [`NodeShell`].
#[derive(Debug, Clone)]
pub struct Node<V, P, K> {
    entry: Entry<V, P>,
    tag: K,
    left: Link,
    right: Link,
    parent: Link,
}

impl<V, P, K> Relink for Node<V, P, K> {
    fn relink<F: Fn(NodeRef) -> NodeRef>(&mut self, map: F) {
        self.left = self.left.map(&map);
        self.right = self.right.map(&map);
        self.parent = self.parent.map(&map);
    }
}

/// The allocation a skew heap node lives in; what pools hand out
pub type NodeShell<V, P, K = ()> = Shell<Node<V, P, K>>;

/// Skew Heap
///
/// `K` is the per-node tag; it is `()` for this untracked form. See
/// [`TrackedSkewHeap`](crate::TrackedSkewHeap) for ID-addressed access.
pub struct SkewHeap<V, P, C, K = (), Pl = LocalPool<NodeShell<V, P, K>>> {
    arena: Arena<Node<V, P, K>, Pl>,
    root: Link,
    cmp: C,
}

impl<V, P, C: Comparator<P>> SkewHeap<V, P, C> {
    /// Creates an empty heap ordered by `cmp`, recycling retired nodes
    pub fn new(cmp: C) -> Self {
        Self::with_pool(cmp, LocalPool::new())
    }
}

impl<V, P, C: Comparator<P>, Pl: Pool<NodeShell<V, P>>> SkewHeap<V, P, C, (), Pl> {
    /// Creates an empty heap that takes node shells from `pool`
    pub fn with_pool(cmp: C, pool: Pl) -> Self {
        Self::empty(cmp, pool)
    }
}

impl<V, P, C: Comparator<P>, K, Pl: Pool<NodeShell<V, P, K>>> SkewHeap<V, P, C, K, Pl> {
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

    /// Melds two trees; the returned root has no parent
    fn meld(&mut self, a: Link, b: Link) -> Link {
        let root = match (a, b) {
            (None, b) => b,
            (a, None) => a,
            (Some(a), Some(b)) => Some(self.meld_roots(a, b)),
        };
        if let Some(root) = root {
            self.arena[root].parent = None;
        }
        root
    }

    fn meld_roots(&mut self, a: NodeRef, b: NodeRef) -> NodeRef {
        let (root, mut other) = if self.precedes(b, a) { (b, a) } else { (a, b) };
        let mut current = root;
        loop {
            // The result of melding the old right subtree with `other`
            // becomes the new left child; the old left child moves right.
            let (left, right) = {
                let node = &self.arena[current];
                (node.left, node.right)
            };
            self.arena[current].right = left;
            match right {
                None => {
                    self.attach_left(current, other);
                    return root;
                }
                Some(right) => {
                    let (winner, loser) = if self.precedes(other, right) {
                        (other, right)
                    } else {
                        (right, other)
                    };
                    self.attach_left(current, winner);
                    current = winner;
                    other = loser;
                }
            }
        }
    }

    #[inline]
    fn attach_left(&mut self, parent: NodeRef, child: NodeRef) {
        self.arena[parent].left = Some(child);
        self.arena[child].parent = Some(parent);
    }

    /// Replaces `node` by the meld of its children, leaving it isolated
    fn detach(&mut self, node: NodeRef) {
        let (left, right, parent) = {
            let n = &mut self.arena[node];
            (n.left.take(), n.right.take(), n.parent.take())
        };
        let replacement = self.meld(left, right);
        match parent {
            None => self.root = replacement,
            Some(parent) => {
                let slot = &mut self.arena[parent];
                if slot.left == Some(node) {
                    slot.left = replacement;
                } else {
                    slot.right = replacement;
                }
                if let Some(replacement) = replacement {
                    self.arena[replacement].parent = Some(parent);
                }
            }
        }
    }

    fn insert_node(&mut self, entry: Entry<V, P>, tag: K) -> NodeRef {
        let node = self.arena.alloc(Node {
            entry,
            tag,
            left: None,
            right: None,
            parent: None,
        });
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
        let improves = !self.cmp.precedes(&self.arena[node].entry.priority, &priority);
        if improves && self.root == Some(node) {
            self.arena[node].entry.priority = priority;
            return;
        }
        self.detach(node);
        self.arena[node].entry.priority = priority;
        self.root = self.meld(self.root, Some(node));
    }

    /// Checks heap order and parent links
    ///
    /// This walks the whole tree; it is meant for tests and debugging.
    pub fn verify_internal_structure(&self) -> bool {
        let Some(root) = self.root else {
            return self.arena.is_empty();
        };
        if self.arena[root].parent.is_some() {
            return false;
        }
        let mut seen = 0usize;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            seen += 1;
            let n = &self.arena[node];
            for child in [n.left, n.right].into_iter().flatten() {
                if self.arena[child].parent != Some(node) || self.precedes(child, node) {
                    return false;
                }
                stack.push(child);
            }
        }
        seen == self.arena.len()
    }
}

impl<V, P, C: Comparator<P>, Pl: Pool<NodeShell<V, P>>> Heap<V, P> for SkewHeap<V, P, C, (), Pl> {
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
    for SkewHeap<V, P, C, (), Pl>
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
    for SkewHeap<V, P, C, K, Pl>
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
        trace!(left = self.arena.len(), right = other.arena.len(), "melding skew heaps");
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

impl<V, P, C, K, Pl> Clone for SkewHeap<V, P, C, K, Pl>
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

impl<V, P, C, K, Pl> fmt::Debug for SkewHeap<V, P, C, K, Pl>
where
    V: fmt::Debug,
    P: fmt::Debug,
    C: Comparator<P>,
    Pl: Pool<NodeShell<V, P, K>>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkewHeap")
            .field("len", &self.arena.len())
            .field("top", &self.root_entry())
            .finish()
    }
}
