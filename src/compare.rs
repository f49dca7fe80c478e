//! Comparators
//!
//! A comparator answers one question: should priority `a` be extracted before
//! priority `b`? It must be a strict weak ordering (irreflexive and
//! transitive, with transitive incomparability). Engines never check this;
//! handing them an inconsistent comparator yields an unspecified, but memory
//! safe, extraction order.
//!
//! Any `Fn(&P, &P) -> bool + Clone` closure is a comparator:
//!
//! ```rust
//! use meldheap::{Comparator, MaxOrder};
//!
//! let by_len = |a: &&str, b: &&str| a.len() < b.len();
//! assert!(by_len.precedes(&"ab", &"abc"));
//! assert!(MaxOrder.precedes(&9, &2));
//! ```

/// Decides extraction order between two priorities
pub trait Comparator<P>: Clone {
    /// Returns true if `a` should be extracted before `b`
    fn precedes(&self, a: &P, b: &P) -> bool;
}

impl<P, F> Comparator<P> for F
where
    F: Fn(&P, &P) -> bool + Clone,
{
    #[inline]
    fn precedes(&self, a: &P, b: &P) -> bool {
        self(a, b)
    }
}

/// Smallest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinOrder;

impl<P: Ord> Comparator<P> for MinOrder {
    #[inline]
    fn precedes(&self, a: &P, b: &P) -> bool {
        a < b
    }
}

/// Largest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxOrder;

impl<P: Ord> Comparator<P> for MaxOrder {
    #[inline]
    fn precedes(&self, a: &P, b: &P) -> bool {
        a > b
    }
}
