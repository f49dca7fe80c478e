//! Null-path length type for leftist heap nodes
//!
//! # Why u8?
//!
//! The null-path length (the `s`-value) of a node is the length of the
//! shortest path from that node down to a missing child. A leftist tree whose
//! root has `s = k` contains at least `2^k - 1` nodes, so the `s`-value of any
//! node is bounded by `log₂(n + 1)`.
//!
//! For practical purposes:
//! - 2⁶⁴ elements → max `s` of 64
//! - 2²⁵⁵ elements → max `s` of 255
//!
//! `u8` therefore covers every heap that fits in memory while keeping the
//! field from adding padding to the node.
//!
//! By convention `s(nil) = 0` and `s(leaf) = 1`.

/// Type alias for a node's null-path length.
pub type Rank = u8;

/// `s`-value of a missing child.
pub const NIL_RANK: Rank = 0;

/// `s`-value of a freshly created, childless node.
pub const LEAF_RANK: Rank = 1;

/// Safely increment a rank value, panicking on overflow.
///
/// # Panics
///
/// Panics if `rank == u8::MAX`. This would require a leftist heap with more
/// than 2²⁵⁵ elements.
///
/// # Example
///
/// ```rust
/// use meldheap::rank::{checked_increment, Rank};
///
/// let rank: Rank = 5;
/// assert_eq!(checked_increment(rank), 6);
/// ```
#[inline]
pub fn checked_increment(rank: Rank) -> Rank {
    rank.checked_add(1).expect(
        "rank overflow: a null-path length is at most log₂(n + 1) \
         and u8::MAX (255) covers heaps with up to 2²⁵⁵ elements",
    )
}
