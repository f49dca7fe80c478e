//! Leftist Heap implementation
//!
//! A leftist heap is a binary heap-ordered tree with one structural rule: for
//! every node, the null-path length of the left child is at least that of the
//! right child. The right spine is therefore at most `log₂(n + 1)` long, and
//! melding, which only ever walks right spines, is O(log n) in the worst
//! case rather than amortized.
//!
//! | Operation          | Complexity      |
//! |--------------------|-----------------|
//! | `push`             | O(log n)        |
//! | `pop`              | O(log n)        |
//! | `peek`             | O(1)            |
//! | `merge`            | O(log n)*       |
//! | `update_priority`  | O(log n)        |
//!
//! *Plus relocation of the other heap's nodes into this heap's arena.
//!
//! Detaching a node from the middle of the tree can shorten the null-path
//! length of its ancestors, so after the node is replaced by the meld of its
//! children the `s`-values are recomputed upwards until one stops changing.

use crate::arena::{Arena, Link, NodeRef, Relink, Remap, Shell};
use crate::compare::Comparator;
use crate::entry::Entry;
use crate::pool::{LocalPool, Pool};
use crate::rank::{checked_increment, Rank, LEAF_RANK, NIL_RANK};
use crate::traits::{Heap, HeapError, MeldTree, MeldableHeap, Result};
use std::fmt;
use tracing::trace;

/// A leftist heap node
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
    /// Null-path length of this node
    rank: Rank,
}

impl<V, P, K> Relink for Node<V, P, K> {
    fn relink<F: Fn(NodeRef) -> NodeRef>(&mut self, map: F) {
        self.left = self.left.map(&map);
        self.right = self.right.map(&map);
        self.parent = self.parent.map(&map);
    }
}

/// The allocation a leftist heap node lives in; what pools hand out
pub type NodeShell<V, P, K = ()> = Shell<Node<V, P, K>>;

/// Leftist Heap
///
/// `K` is the per-node tag; it is `()` for this untracked form. See
/// [`TrackedLeftistHeap`](crate::TrackedLeftistHeap) for ID-addressed access.
///
/// # Example
///
/// ```rust
/// use meldheap::{Heap, LeftistHeap, MeldableHeap, MinOrder};
///
/// let mut a = LeftistHeap::new(MinOrder);
/// let mut b = LeftistHeap::new(MinOrder);
/// a.push("x", 4).unwrap();
/// b.push("y", 2).unwrap();
/// a.merge(b).unwrap();
/// assert_eq!(a.peek(), Ok((&"y", &2)));
/// assert!(a.verify_internal_structure());
/// ```
pub struct LeftistHeap<V, P, C, K = (), Pl = LocalPool<NodeShell<V, P, K>>> {
    arena: Arena<Node<V, P, K>, Pl>,
    root: Link,
    cmp: C,
}

impl<V, P, C: Comparator<P>> LeftistHeap<V, P, C> {
    /// Creates an empty heap ordered by `cmp`, recycling retired nodes
    pub fn new(cmp: C) -> Self {
        Self::with_pool(cmp, LocalPool::new())
    }
}

impl<V, P, C: Comparator<P>, Pl: Pool<NodeShell<V, P>>> LeftistHeap<V, P, C, (), Pl> {
    /// Creates an empty heap that takes node shells from `pool`
    pub fn with_pool(cmp: C, pool: Pl) -> Self {
        Self::empty(cmp, pool)
    }
}

impl<V, P, C: Comparator<P>, K, Pl: Pool<NodeShell<V, P, K>>> LeftistHeap<V, P, C, K, Pl> {
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

    #[inline]
    fn rank(&self, link: Link) -> Rank {
        link.map_or(NIL_RANK, |node| self.arena[node].rank)
    }

    /// Melds two trees; the returned root has no parent
    fn meld(&mut self, a: Link, b: Link) -> Link {
        let root = self.meld_spines(a, b);
        if let Some(root) = root {
            self.arena[root].parent = None;
        }
        root
    }

    /// Recursive meld down the right spines
    fn meld_spines(&mut self, a: Link, b: Link) -> Link {
        let (a, b) = match (a, b) {
            (None, b) => return b,
            (a, None) => return a,
            (Some(a), Some(b)) => (a, b),
        };
        let (root, other) = if self.precedes(b, a) { (b, a) } else { (a, b) };
        let right = self.arena[root].right;
        let merged = self.meld_spines(right, Some(other));
        self.arena[root].right = merged;
        if let Some(merged) = merged {
            self.arena[merged].parent = Some(root);
        }
        self.restore_rank(root);
        Some(root)
    }

    /// Swaps children if the leftist property is violated and recomputes the
    /// `s`-value; returns true if the `s`-value changed
    fn restore_rank(&mut self, node: NodeRef) -> bool {
        let (left, right) = {
            let n = &self.arena[node];
            (n.left, n.right)
        };
        let (left_rank, right_rank) = (self.rank(left), self.rank(right));
        let shorter = if left_rank < right_rank {
            let n = &mut self.arena[node];
            n.left = right;
            n.right = left;
            left_rank
        } else {
            right_rank
        };
        let rank = checked_increment(shorter);
        let n = &mut self.arena[node];
        let changed = n.rank != rank;
        n.rank = rank;
        changed
    }

    /// Replaces `node` by the meld of its children, leaving it isolated, then
    /// repairs `s`-values on the path to the root
    fn detach(&mut self, node: NodeRef) {
        let (left, right, parent) = {
            let n = &mut self.arena[node];
            n.rank = LEAF_RANK;
            (n.left.take(), n.right.take(), n.parent.take())
        };
        let replacement = self.meld(left, right);
        let Some(parent) = parent else {
            self.root = replacement;
            return;
        };

        {
            let slot = &mut self.arena[parent];
            if slot.left == Some(node) {
                slot.left = replacement;
            } else {
                slot.right = replacement;
            }
        }
        if let Some(replacement) = replacement {
            self.arena[replacement].parent = Some(parent);
        }

        let mut current = Some(parent);
        while let Some(ancestor) = current {
            if !self.restore_rank(ancestor) {
                break;
            }
            current = self.arena[ancestor].parent;
        }
    }

    fn insert_node(&mut self, entry: Entry<V, P>, tag: K) -> NodeRef {
        let node = self.arena.alloc(Node {
            entry,
            tag,
            left: None,
            right: None,
            parent: None,
            rank: LEAF_RANK,
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
        trace!(?node, "detaching leftist node for priority update");
        self.detach(node);
        self.arena[node].entry.priority = priority;
        self.root = self.meld(self.root, Some(node));
    }

    /// Checks heap order, parent links, `s`-values and the leftist property
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
            let (left_rank, right_rank) = (self.rank(n.left), self.rank(n.right));
            if left_rank < right_rank || n.rank != right_rank + 1 {
                return false;
            }
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

impl<V, P, C: Comparator<P>, Pl: Pool<NodeShell<V, P>>> Heap<V, P> for LeftistHeap<V, P, C, (), Pl> {
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
    for LeftistHeap<V, P, C, (), Pl>
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
    for LeftistHeap<V, P, C, K, Pl>
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
        trace!(left = self.arena.len(), right = other.arena.len(), "melding leftist heaps");
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

impl<V, P, C, K, Pl> Clone for LeftistHeap<V, P, C, K, Pl>
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

impl<V, P, C, K, Pl> fmt::Debug for LeftistHeap<V, P, C, K, Pl>
where
    V: fmt::Debug,
    P: fmt::Debug,
    C: Comparator<P>,
    Pl: Pool<NodeShell<V, P, K>>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeftistHeap")
            .field("len", &self.arena.len())
            .field("top", &self.root_entry())
            .field("root_rank", &self.rank(self.root))
            .finish()
    }
}
