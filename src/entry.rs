//! The `(value, priority)` pair every engine stores

/// A value together with the priority it is ordered by
///
/// Array and radix engines replace entries wholesale; tree engines keep the
/// entry inside an arena node and may rewrite its priority while the node is
/// detached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Entry<V, P> {
    /// Payload
    pub value: V,
    /// Ordering key
    pub priority: P,
}

impl<V, P> Entry<V, P> {
    /// Creates a new entry
    #[inline]
    pub fn new(value: V, priority: P) -> Self {
        Self { value, priority }
    }

    /// Borrows both halves
    #[inline]
    pub fn as_refs(&self) -> (&V, &P) {
        (&self.value, &self.priority)
    }

    /// Splits the entry into its value and priority
    #[inline]
    pub fn into_parts(self) -> (V, P) {
        (self.value, self.priority)
    }
}

impl<V, P> From<(V, P)> for Entry<V, P> {
    fn from((value, priority): (V, P)) -> Self {
        Self::new(value, priority)
    }
}
