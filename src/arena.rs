//! Arena storage for tree heap nodes
//!
//! Tree heaps need parent, child and sibling links that point in both
//! directions. Instead of `Rc<RefCell<_>>` webs or raw pointers, every tree
//! keeps its nodes in an [`Arena`] and links them with [`NodeRef`] indices.
//! Detaching a node from the middle of a tree is then a matter of rewriting a
//! few indices, and cloning a tree is a copy of the live slots plus an index
//! remap.
//!
//! # Slots and shells
//!
//! A slot is an index; a [`Shell`] is the allocation the node lives in. Vacant
//! slot indices are always recycled by the arena itself, so the slot table
//! never outgrows the largest number of nodes that were live at once. Shells
//! are what the arena's [`Pool`] manages: a retired node's shell is handed to
//! the pool, and the next allocation asks the pool for one.

use crate::pool::Pool;
use std::fmt;
use std::ops::{Index, IndexMut};
use tracing::trace;

/// The allocation a tree node lives in; empty while parked in a pool
pub type Shell<N> = Box<Option<N>>;

/// Index of a node inside an [`Arena`]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(usize);

impl NodeRef {
    /// Placeholder for slots that have no counterpart in a [`Remap`]
    const DANGLING: NodeRef = NodeRef(usize::MAX);

    #[inline]
    fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A link to a node, or nothing
pub type Link = Option<NodeRef>;

/// Nodes that hold links to other nodes of the same arena
pub trait Relink {
    /// Rewrites every link this node holds through `map`
    fn relink<F: Fn(NodeRef) -> NodeRef>(&mut self, map: F);
}

/// Maps node references of one arena onto another after relocation
#[derive(Debug, Clone, Default)]
pub struct Remap {
    to: Vec<NodeRef>,
}

impl Remap {
    /// The new location of `node`
    #[inline]
    pub fn get(&self, node: NodeRef) -> NodeRef {
        self.to[node.index()]
    }

    /// [`get`](Remap::get) lifted over a link
    #[inline]
    pub fn link(&self, link: Link) -> Link {
        link.map(|node| self.get(node))
    }
}

/// Slot storage for tree nodes
pub struct Arena<N, Pl> {
    slots: Vec<Option<Shell<N>>>,
    vacant: Vec<usize>,
    pool: Pl,
    live: usize,
}

impl<N, Pl: Pool<Shell<N>>> Arena<N, Pl> {
    /// Creates an empty arena drawing shells from `pool`
    pub fn new(pool: Pl) -> Self {
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
            pool,
            live: 0,
        }
    }

    /// The pool retired shells go to
    pub fn pool(&self) -> &Pl {
        &self.pool
    }

    /// Number of live nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns true if no node is live
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots, live or vacant
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Stores `node` in a shell from the pool
    pub fn alloc(&mut self, node: N) -> NodeRef {
        let mut shell = self.pool.get(|| Box::new(None));
        *shell = Some(node);
        self.place(shell)
    }

    /// Puts an occupied shell into a vacant slot, or a new one
    fn place(&mut self, shell: Shell<N>) -> NodeRef {
        debug_assert!(shell.is_some(), "placing an empty shell");
        self.live += 1;
        match self.vacant.pop() {
            Some(index) => {
                debug_assert!(self.slots[index].is_none(), "vacant slot {index} is occupied");
                self.slots[index] = Some(shell);
                NodeRef(index)
            }
            None => {
                self.slots.push(Some(shell));
                NodeRef(self.slots.len() - 1)
            }
        }
    }

    /// Retires the node at `at`, returning it; its shell goes to the pool
    pub fn free(&mut self, at: NodeRef) -> N {
        let Some(mut shell) = self.slots.get_mut(at.index()).and_then(Option::take) else {
            panic!("node {at:?} freed twice");
        };
        let Some(node) = Option::take(&mut *shell) else {
            panic!("slot {at:?} held an empty shell");
        };
        self.vacant.push(at.index());
        self.live -= 1;
        self.pool.put(shell);
        node
    }

    /// Returns the node at `at` if it is live
    #[inline]
    pub fn get(&self, at: NodeRef) -> Option<&N> {
        self.slots
            .get(at.index())
            .and_then(|slot| slot.as_deref())
            .and_then(Option::as_ref)
    }

    /// Returns the node at `at` mutably if it is live
    #[inline]
    pub fn get_mut(&mut self, at: NodeRef) -> Option<&mut N> {
        self.slots
            .get_mut(at.index())
            .and_then(|slot| slot.as_deref_mut())
            .and_then(Option::as_mut)
    }

    /// Iterates over live nodes in slot order
    pub fn iter(&self) -> impl Iterator<Item = (NodeRef, &N)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.as_deref()
                .and_then(Option::as_ref)
                .map(|node| (NodeRef(i), node))
        })
    }

    /// Retires every node, returning all shells to the pool
    pub fn clear(&mut self) {
        for mut shell in self.slots.drain(..).flatten() {
            *shell = None;
            self.pool.put(shell);
        }
        self.vacant.clear();
        self.live = 0;
    }

    /// An empty arena whose pool is forked from this one
    pub fn empty_like(&self) -> Self {
        Self::new(self.pool.fork())
    }
}

impl<N: Relink, Pl: Pool<Shell<N>>> Arena<N, Pl> {
    /// Moves every live node of `other` into this arena
    ///
    /// Shells move along with their nodes. Returns where each of `other`'s
    /// nodes ended up; links between the moved nodes are already rewritten.
    pub fn absorb(&mut self, other: Arena<N, Pl>) -> Remap {
        let mut to = vec![NodeRef::DANGLING; other.slots.len()];
        let mut moved = Vec::with_capacity(other.live);
        for (i, slot) in other.slots.into_iter().enumerate() {
            if let Some(shell) = slot {
                let at = self.place(shell);
                to[i] = at;
                moved.push(at);
            }
        }
        let remap = Remap { to };
        for &at in &moved {
            self[at].relink(|old| remap.get(old));
        }
        trace!(moved = moved.len(), live = self.live, "absorbed arena");
        remap
    }
}

impl<N: Clone + Relink, Pl: Pool<Shell<N>>> Arena<N, Pl> {
    /// A copy holding only the live nodes, packed from slot 0
    pub fn compacted(&self) -> (Arena<N, Pl>, Remap) {
        let mut copy = self.empty_like();
        let mut to = vec![NodeRef::DANGLING; self.slots.len()];
        for (at, node) in self.iter() {
            to[at.index()] = copy.alloc(node.clone());
        }
        let remap = Remap { to };
        for node in copy.slots.iter_mut().flatten() {
            if let Some(node) = Option::as_mut(&mut **node) {
                node.relink(|old| remap.get(old));
            }
        }
        (copy, remap)
    }
}

impl<N, Pl: Pool<Shell<N>>> Index<NodeRef> for Arena<N, Pl> {
    type Output = N;

    #[inline]
    fn index(&self, at: NodeRef) -> &N {
        match self.get(at) {
            Some(node) => node,
            None => panic!("dangling node reference {at:?}"),
        }
    }
}

impl<N, Pl: Pool<Shell<N>>> IndexMut<NodeRef> for Arena<N, Pl> {
    #[inline]
    fn index_mut(&mut self, at: NodeRef) -> &mut N {
        match self.get_mut(at) {
            Some(node) => node,
            None => panic!("dangling node reference {at:?}"),
        }
    }
}

impl<N: fmt::Debug, Pl: Pool<Shell<N>>> fmt::Debug for Arena<N, Pl> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
