//! Swap-notification bookkeeping for array heaps
//!
//! Array heaps address elements by index, and indices shift on every sift.
//! Code that needs to follow an element registers a callback here; the heap
//! invokes every registered callback synchronously with the two indices of
//! each swap it performs.
//!
//! Handles are generational `slotmap` keys, so a handle that was deregistered
//! stays invalid even after its slot is reused.

use crate::traits::{HeapError, Result};
use slotmap::{new_key_type, SlotMap};
use std::fmt;

new_key_type! {
    /// Identifies a registered swap callback
    pub struct CallbackHandle;
}

/// A swap callback; receives both indices involved in the swap
///
/// Callbacks must be `Sync` so that a heap holding them can sit behind a
/// shared lock.
pub type SwapCallback = Box<dyn FnMut(usize, usize) + Send + Sync>;

/// The set of callbacks registered on one heap
#[derive(Default)]
pub struct CallbackRegistry {
    callbacks: SlotMap<CallbackHandle, SwapCallback>,
}

impl CallbackRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback`, returning the handle to deregister it with
    pub fn register<F>(&mut self, callback: F) -> CallbackHandle
    where
        F: FnMut(usize, usize) + Send + Sync + 'static,
    {
        self.callbacks.insert(Box::new(callback))
    }

    /// Removes the callback registered under `handle`
    ///
    /// # Errors
    /// [`HeapError::CallbackNotFound`] if the handle is unknown or stale.
    pub fn deregister(&mut self, handle: CallbackHandle) -> Result<()> {
        self.callbacks
            .remove(handle)
            .map(|_| ())
            .ok_or(HeapError::CallbackNotFound)
    }

    /// Invokes every callback with the swapped indices
    #[inline]
    pub fn notify(&mut self, i: usize, j: usize) {
        for callback in self.callbacks.values_mut() {
            callback(i, j);
        }
    }

    /// Number of registered callbacks
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Returns true if no callback is registered
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
