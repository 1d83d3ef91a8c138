//! Singleton service lifecycle
//!
//! Every stateful service in this crate hangs its process-wide instance off
//! a `ServiceHandle`: absent until first access, created lazily, discarded
//! on `destroy`. Handles are independent of each other, and a handle can
//! just as well live on the stack when a test wants an isolated lifecycle.

use std::sync::{Arc, Mutex};

/// A service that can be constructed on first access.
pub trait Service: Send + Sync + Sized + 'static {
    /// Build the initial instance. Called once per lifecycle session.
    fn create() -> Self;
}

/// Slot holding at most one shared instance of `T`.
///
/// Between destroys, every `instance()` call observes the identical `Arc`;
/// creation and teardown are serialized by the slot's mutex.
pub struct ServiceHandle<T: Service> {
    slot: Mutex<Option<Arc<T>>>,
}

impl<T: Service> ServiceHandle<T> {
    /// Empty handle, usable in statics.
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// The current instance, constructing it on first call.
    pub fn instance(&self) -> Arc<T> {
        let mut slot = self.slot.lock().unwrap();
        slot.get_or_insert_with(|| Arc::new(T::create())).clone()
    }

    /// Discard the current instance. The next `instance()` call starts a
    /// fresh lifecycle session.
    pub fn destroy(&self) {
        *self.slot.lock().unwrap() = None;
    }
}

impl<T: Service> Default for ServiceHandle<T> {
    fn default() -> Self {
        Self::new()
    }
}
