//! Registry mapping opaque handles to loaded models.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::engine::AnnotatorError;

/// Unique handle to a loaded model.
///
/// Handles come from a monotonic counter starting at 1 and are never
/// reused, so a stale handle is always detected. `0` is never issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelHandle(u64);

impl ModelHandle {
    /// The value returned across the boundary when no handle was issued.
    pub const INVALID: ModelHandle = ModelHandle(0);

    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Thread-safe registry of loaded models.
///
/// Lookups take a read lock only long enough to clone the entry's `Arc`;
/// the model itself is used outside the lock. Structural changes take the
/// write lock. `parking_lot` locks do not poison, so a panic in one
/// caller never wedges the registry for the others.
pub struct HandleRegistry<T: ?Sized> {
    models: RwLock<HashMap<ModelHandle, Arc<T>>>,
    next_id: AtomicU64,
}

impl<T: ?Sized> HandleRegistry<T> {
    pub fn new() -> Self {
        Self {
            models: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a model and return its fresh handle.
    pub fn insert(&self, model: Arc<T>) -> ModelHandle {
        let handle = ModelHandle(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.models.write().insert(handle, model);
        handle
    }

    /// Look up a model without removing it.
    pub fn resolve(&self, handle: ModelHandle) -> Result<Arc<T>, AnnotatorError> {
        self.models
            .read()
            .get(&handle)
            .cloned()
            .ok_or(AnnotatorError::InvalidHandle(handle.id()))
    }

    /// Remove a model from the registry.
    ///
    /// The model is dropped once the returned `Arc` and any in-flight
    /// references are gone.
    pub fn remove(&self, handle: ModelHandle) -> Result<Arc<T>, AnnotatorError> {
        self.models
            .write()
            .remove(&handle)
            .ok_or(AnnotatorError::InvalidHandle(handle.id()))
    }

    /// Check if a model handle is valid.
    pub fn contains(&self, handle: ModelHandle) -> bool {
        self.models.read().contains_key(&handle)
    }

    /// Number of loaded models.
    pub fn len(&self) -> usize {
        self.models.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.read().is_empty()
    }

    /// Live handles, in issue order.
    pub fn handles(&self) -> Vec<ModelHandle> {
        let mut handles: Vec<_> = self.models.read().keys().copied().collect();
        handles.sort_unstable();
        handles
    }
}

impl<T: ?Sized> Default for HandleRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
