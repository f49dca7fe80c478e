//! Node reuse strategies
//!
//! Tree engines keep each node in its own heap allocation, a
//! [`Shell`](crate::arena::Shell). A [`Pool`] decides what happens to a shell
//! once its node has been retired, and where the next insertion gets its shell
//! from:
//!
//! - [`AllocPool`]: drops retired shells; every insertion allocates
//! - [`LocalPool`]: an unlocked free list owned by a single heap (the default)
//! - [`ReusePool`]: a free list behind a `parking_lot` mutex. Wrapped in an
//!   [`Arc`], one pool can feed several heaps, including heaps behind separate
//!   [`SyncHeap`](crate::SyncHeap)s on different threads.
//!
//! The pool is handed to the heap at construction (`with_pool`), so it is never
//! process-wide state and tests can substitute their own implementation.
//!
//! # Example
//!
//! ```rust
//! use meldheap::{Heap, MinOrder, PairingHeap, Pool, ReusePool};
//! use std::sync::Arc;
//!
//! let shared = Arc::new(ReusePool::new());
//! let mut a = PairingHeap::with_pool(MinOrder, Arc::clone(&shared));
//! let mut b = PairingHeap::with_pool(MinOrder, Arc::clone(&shared));
//!
//! a.push("x", 1).unwrap();
//! a.pop().unwrap();
//! assert_eq!(shared.idle(), 1);
//!
//! // `b` picks up the node `a` retired.
//! b.push("y", 2).unwrap();
//! assert_eq!(shared.idle(), 0);
//! ```

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;

/// Allocation/reuse strategy for items of type `T`
pub trait Pool<T> {
    /// Returns a recycled item, or calls `fresh` to make one
    fn get<F: FnOnce() -> T>(&mut self, fresh: F) -> T;

    /// Returns an item for reuse; a no-op for non-recycling pools
    fn put(&mut self, item: T);

    /// Number of items waiting to be reused
    fn idle(&self) -> usize;

    /// Drops every idle item
    fn purge(&mut self);

    /// The pool for a heap derived from this one by `clone` or `take`
    ///
    /// Owned pools start a new, empty pool; shared pools hand out another
    /// reference to themselves.
    fn fork(&self) -> Self
    where
        Self: Sized;
}

/// A pool that never recycles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocPool;

impl<T> Pool<T> for AllocPool {
    #[inline]
    fn get<F: FnOnce() -> T>(&mut self, fresh: F) -> T {
        fresh()
    }

    #[inline]
    fn put(&mut self, _item: T) {}

    fn idle(&self) -> usize {
        0
    }

    fn purge(&mut self) {}

    fn fork(&self) -> Self {
        AllocPool
    }
}

/// A free list owned by one heap; no locking
#[derive(Debug)]
pub struct LocalPool<T> {
    free: Vec<T>,
}

impl<T> LocalPool<T> {
    /// Creates an empty free list
    pub fn new() -> Self {
        Self { free: Vec::new() }
    }
}

impl<T> Default for LocalPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Pool<T> for LocalPool<T> {
    #[inline]
    fn get<F: FnOnce() -> T>(&mut self, fresh: F) -> T {
        self.free.pop().unwrap_or_else(fresh)
    }

    #[inline]
    fn put(&mut self, item: T) {
        self.free.push(item);
    }

    fn idle(&self) -> usize {
        self.free.len()
    }

    fn purge(&mut self) {
        trace!(dropped = self.free.len(), "purging local pool");
        self.free.clear();
    }

    fn fork(&self) -> Self {
        Self::new()
    }
}

/// A concurrency-safe free list
///
/// All methods take `&self`, so the pool can sit behind an [`Arc`] and be
/// shared by any number of heaps.
#[derive(Debug)]
pub struct ReusePool<T> {
    free: Mutex<Vec<T>>,
}

impl<T> ReusePool<T> {
    /// Creates an empty free list
    pub fn new() -> Self {
        Self {
            free: Mutex::new(Vec::new()),
        }
    }

    /// Returns a recycled item, or calls `fresh` to make one
    pub fn get<F: FnOnce() -> T>(&self, fresh: F) -> T {
        // Release the lock before running `fresh`.
        let recycled = self.free.lock().pop();
        recycled.unwrap_or_else(fresh)
    }

    /// Parks `item` for reuse
    pub fn put(&self, item: T) {
        self.free.lock().push(item);
    }

    /// Number of items waiting to be reused
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }

    /// Drops every idle item
    pub fn purge(&self) {
        let mut free = self.free.lock();
        trace!(dropped = free.len(), "purging reuse pool");
        free.clear();
    }
}

impl<T> Default for ReusePool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Pool<T> for ReusePool<T> {
    fn get<F: FnOnce() -> T>(&mut self, fresh: F) -> T {
        ReusePool::get(&*self, fresh)
    }

    fn put(&mut self, item: T) {
        ReusePool::put(&*self, item);
    }

    fn idle(&self) -> usize {
        ReusePool::idle(self)
    }

    fn purge(&mut self) {
        ReusePool::purge(&*self);
    }

    fn fork(&self) -> Self {
        Self::new()
    }
}

impl<T> Pool<T> for Arc<ReusePool<T>> {
    fn get<F: FnOnce() -> T>(&mut self, fresh: F) -> T {
        ReusePool::get(&**self, fresh)
    }

    fn put(&mut self, item: T) {
        ReusePool::put(&**self, item);
    }

    fn idle(&self) -> usize {
        ReusePool::idle(&**self)
    }

    fn purge(&mut self) {
        ReusePool::purge(&**self);
    }

    fn fork(&self) -> Self {
        Arc::clone(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_pool_never_recycles() {
        let mut pool = AllocPool;
        pool.put(5);
        assert_eq!(Pool::<i32>::idle(&pool), 0);
        assert_eq!(pool.get(|| 9), 9);
    }

    #[test]
    fn test_local_pool_recycles() {
        let mut pool = LocalPool::new();
        assert_eq!(pool.get(|| 1), 1);
        pool.put(7);
        assert_eq!(pool.idle(), 1);
        assert_eq!(pool.get(|| 1), 7);
        assert_eq!(pool.idle(), 0);

        pool.put(3);
        assert_eq!(pool.fork().idle(), 0);
        pool.purge();
        assert_eq!(pool.get(|| 0), 0);
    }

    #[test]
    fn test_reuse_pool_recycles() {
        let pool = ReusePool::new();
        assert_eq!(pool.get(|| 1), 1);
        pool.put(7);
        assert_eq!(pool.idle(), 1);
        assert_eq!(pool.get(|| 1), 7);
        assert_eq!(pool.idle(), 0);

        pool.put(3);
        pool.purge();
        assert_eq!(pool.get(|| 0), 0);
    }

    #[test]
    fn test_shared_pool_fork_shares() {
        let mut shared = Arc::new(ReusePool::new());
        let forked = Pool::<u8>::fork(&shared);
        Pool::put(&mut shared, 4u8);
        assert_eq!(Pool::idle(&forked), 1);
        assert_eq!((*forked).get(|| 0), 4);

        let owned: ReusePool<u8> = ReusePool::new();
        owned.put(1);
        assert_eq!(Pool::fork(&owned).idle(), 0);
    }

    #[test]
    fn test_reuse_pool_concurrent() {
        let pool = ReusePool::new();
        std::thread::scope(|s| {
            for t in 0..4 {
                let pool = &pool;
                s.spawn(move || {
                    for i in 0..100 {
                        pool.put(t * 1000 + i);
                        let _ = pool.get(|| 0);
                    }
                });
            }
        });
        assert_eq!(pool.idle(), 0);
    }
}
