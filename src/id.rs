//! ID issuance for tracked heaps
//!
//! Tracked heaps hand every pushed element an ID drawn from an [`IdGenerator`].
//! Two generators ship with the crate:
//!
//! - [`SequentialIds`]: `0, 1, 2, ...` as `u64`
//! - [`UniqueIds`]: random v4 UUIDs (feature `unique-ids`)
//!
//! A generator is a per-heap field, so two heaps never share a counter. An ID
//! is only issued twice after an explicit [`reset`](IdGenerator::reset); the
//! heap reports [`HeapError::IdGenerationCollision`](crate::HeapError) rather
//! than overwrite a still-registered element.

use std::fmt;
use std::hash::Hash;

/// Source of element IDs
pub trait IdGenerator {
    /// The ID type
    type Id: Clone + Eq + Hash + fmt::Debug;

    /// Issues the next ID
    fn next_id(&mut self) -> Self::Id;

    /// Informs the generator that `id` is in use, e.g. after a merge brought in
    /// elements issued by another generator
    fn observe(&mut self, _id: &Self::Id) {}

    /// Starts issuing IDs from the beginning again
    fn reset(&mut self);
}

/// Monotonically increasing integer IDs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Creates a generator whose first ID is 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator whose first ID is `start`
    pub fn starting_at(start: u64) -> Self {
        Self { next: start }
    }
}

impl IdGenerator for SequentialIds {
    type Id = u64;

    #[inline]
    fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }

    fn observe(&mut self, id: &u64) {
        if *id >= self.next {
            self.next = id.wrapping_add(1);
        }
    }

    fn reset(&mut self) {
        self.next = 0;
    }
}

/// Globally unique IDs backed by random (v4) UUIDs
#[cfg(feature = "unique-ids")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniqueIds;

#[cfg(feature = "unique-ids")]
impl IdGenerator for UniqueIds {
    type Id = uuid::Uuid;

    fn next_id(&mut self) -> uuid::Uuid {
        uuid::Uuid::new_v4()
    }

    // Nothing to rewind.
    fn reset(&mut self) {}
}
