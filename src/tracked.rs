//! ID-tracked tree heaps
//!
//! [`Tracked`] turns any [`MeldTree`] engine into a [`TrackedHeap`]: every
//! pushed element receives an ID from an [`IdGenerator`], and an index from ID
//! to arena node makes lookup O(1) and priority updates and removals as cheap
//! as the engine's detach-and-remeld.
//!
//! The index never owns nodes. It is kept in step with the tree: popping,
//! removing or clearing unregisters the ID in the same call.
//!
//! # Example
//!
//! ```rust
//! use meldheap::{Heap, MinOrder, TrackedHeap, TrackedLeftistHeap};
//!
//! let mut heap: TrackedLeftistHeap<&str, u32, MinOrder> = TrackedLeftistHeap::new(MinOrder);
//! let a = heap.push("a", 10).unwrap();
//! let b = heap.push("b", 20).unwrap();
//!
//! heap.update_priority(&b, 5).unwrap();
//! assert_eq!(heap.peek(), Ok((&"b", &5)));
//!
//! assert_eq!(heap.remove(&a), Ok(("a", 10)));
//! assert!(!heap.contains(&a));
//! ```

use crate::arena::NodeRef;
use crate::id::{IdGenerator, SequentialIds};
use crate::leftist::LeftistHeap;
use crate::pairing::PairingHeap;
use crate::skew::SkewHeap;
use crate::traits::{Heap, HeapError, MeldTree, MeldableHeap, Result, TrackedHeap};
use rustc_hash::FxHashMap;
use std::fmt;
use tracing::trace;

/// A tree engine whose elements are addressable by ID
pub struct Tracked<E, G: IdGenerator> {
    tree: E,
    elements: FxHashMap<G::Id, NodeRef>,
    ids: G,
}

/// Pairing heap with ID-addressed update and removal
pub type TrackedPairingHeap<V, P, C, G = SequentialIds> =
    Tracked<PairingHeap<V, P, C, <G as IdGenerator>::Id>, G>;

/// Skew heap with ID-addressed update and removal
pub type TrackedSkewHeap<V, P, C, G = SequentialIds> =
    Tracked<SkewHeap<V, P, C, <G as IdGenerator>::Id>, G>;

/// Leftist heap with ID-addressed update and removal
pub type TrackedLeftistHeap<V, P, C, G = SequentialIds> =
    Tracked<LeftistHeap<V, P, C, <G as IdGenerator>::Id>, G>;

impl<E, G> Tracked<E, G>
where
    E: MeldTree<Tag = G::Id>,
    G: IdGenerator + Default,
{
    /// Creates an empty heap ordered by `cmp`, with a default node pool
    pub fn new(cmp: E::Cmp) -> Self
    where
        E::NodePool: Default,
    {
        Self::with_pool(cmp, Default::default())
    }

    /// Creates an empty heap that takes node shells from `pool`
    pub fn with_pool(cmp: E::Cmp, pool: E::NodePool) -> Self {
        Self::with_generator(cmp, pool, G::default())
    }
}

impl<E, G> Tracked<E, G>
where
    E: MeldTree<Tag = G::Id>,
    G: IdGenerator,
{
    /// Creates an empty heap that draws IDs from `ids`
    pub fn with_generator(cmp: E::Cmp, pool: E::NodePool, ids: G) -> Self {
        Self {
            tree: E::empty_with(cmp, pool),
            elements: FxHashMap::default(),
            ids,
        }
    }

    /// Iterates over the IDs of all live elements, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = &G::Id> {
        self.elements.keys()
    }

    /// Rewinds the ID generator
    ///
    /// IDs issued before the reset may be handed out again; pushing while such
    /// an ID is still live fails with [`HeapError::IdGenerationCollision`].
    pub fn reset_ids(&mut self) {
        self.ids.reset();
    }

    /// The underlying tree engine
    pub fn tree(&self) -> &E {
        &self.tree
    }

    #[inline]
    fn node(&self, id: &G::Id) -> Result<NodeRef> {
        self.elements.get(id).copied().ok_or(HeapError::NodeNotFound)
    }
}

impl<E, G> Heap<E::Value, E::Priority> for Tracked<E, G>
where
    E: MeldTree<Tag = G::Id>,
    G: IdGenerator,
{
    type Handle = G::Id;

    fn push(&mut self, value: E::Value, priority: E::Priority) -> Result<G::Id> {
        let id = self.ids.next_id();
        if self.elements.contains_key(&id) {
            return Err(HeapError::IdGenerationCollision);
        }
        let node = self.tree.insert_tagged(value, priority, id.clone());
        self.elements.insert(id.clone(), node);
        Ok(id)
    }

    fn pop(&mut self) -> Result<(E::Value, E::Priority)> {
        let (value, priority, id) = self.tree.pop_root().ok_or(HeapError::HeapEmpty)?;
        self.elements.remove(&id);
        Ok((value, priority))
    }

    fn peek(&self) -> Result<(&E::Value, &E::Priority)> {
        self.tree.root_entry().ok_or(HeapError::HeapEmpty)
    }

    fn len(&self) -> usize {
        self.tree.node_count()
    }

    fn clear(&mut self) {
        self.tree.clear_nodes();
        self.elements.clear();
    }
}

impl<E, G> TrackedHeap<E::Value, E::Priority> for Tracked<E, G>
where
    E: MeldTree<Tag = G::Id>,
    G: IdGenerator,
{
    fn get(&self, id: &G::Id) -> Result<(&E::Value, &E::Priority)> {
        let node = self.node(id)?;
        Ok(self.tree.entry(node))
    }

    fn contains(&self, id: &G::Id) -> bool {
        self.elements.contains_key(id)
    }

    fn update_value(&mut self, id: &G::Id, value: E::Value) -> Result<()> {
        let node = self.node(id)?;
        *self.tree.value_mut(node) = value;
        Ok(())
    }

    fn update_priority(&mut self, id: &G::Id, priority: E::Priority) -> Result<()> {
        let node = self.node(id)?;
        self.tree.reprioritize(node, priority);
        Ok(())
    }

    fn remove(&mut self, id: &G::Id) -> Result<(E::Value, E::Priority)> {
        let node = self.elements.remove(id).ok_or(HeapError::NodeNotFound)?;
        let (value, priority, _) = self.tree.extract(node);
        Ok((value, priority))
    }
}

impl<E, G> MeldableHeap<E::Value, E::Priority> for Tracked<E, G>
where
    E: MeldTree<Tag = G::Id>,
    G: IdGenerator + Clone,
{
    /// Merges `other` into this heap; IDs issued by either heap stay valid
    ///
    /// # Errors
    /// [`HeapError::IdGenerationCollision`] if both heaps hold an element under
    /// the same ID. Nothing is modified in that case.
    fn merge(&mut self, other: Self) -> Result<()> {
        self.check_merge(&other)?;
        for id in other.elements.keys() {
            self.ids.observe(id);
        }
        let remap = self.tree.absorb(other.tree);
        self.elements.extend(
            other
                .elements
                .into_iter()
                .map(|(id, node)| (id, remap.get(node))),
        );
        trace!(len = self.elements.len(), "merged tracked heaps");
        Ok(())
    }

    fn check_merge(&self, other: &Self) -> Result<()> {
        if other.elements.keys().any(|id| self.elements.contains_key(id)) {
            return Err(HeapError::IdGenerationCollision);
        }
        Ok(())
    }

    fn take(&mut self) -> Self {
        let empty = self.tree.empty_like();
        Self {
            tree: std::mem::replace(&mut self.tree, empty),
            elements: std::mem::take(&mut self.elements),
            ids: self.ids.clone(),
        }
    }
}

impl<E, G> Clone for Tracked<E, G>
where
    E: MeldTree<Tag = G::Id>,
    E::Value: Clone,
    E::Priority: Clone,
    G: IdGenerator + Clone,
{
    fn clone(&self) -> Self {
        let (tree, remap) = self.tree.duplicate();
        let elements = self
            .elements
            .iter()
            .map(|(id, &node)| (id.clone(), remap.get(node)))
            .collect();
        Self {
            tree,
            elements,
            ids: self.ids.clone(),
        }
    }
}

impl<E, G> fmt::Debug for Tracked<E, G>
where
    E: fmt::Debug,
    G: IdGenerator + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracked")
            .field("tree", &self.tree)
            .field("registered", &self.elements.len())
            .field("ids", &self.ids)
            .finish()
    }
}
