//! Single-writer access for multi-threaded hosts
//!
//! Queue, history and session are mutated as one unit per operation. When
//! several threads drive the same controller (UI input plus a hardware
//! "next" button, say) every operation goes through one mutex, and the
//! subscriber fan-out happens inside it.

use crate::events::PlaybackSnapshot;
use crate::manager::PlaybackController;
use std::sync::{Arc, Mutex, PoisonError, TryLockError};

/// Cloneable, mutex-serialized controller handle
#[derive(Debug, Clone)]
pub struct SharedController {
    inner: Arc<Mutex<PlaybackController>>,
}

impl SharedController {
    pub fn new(controller: PlaybackController) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    /// Run one operation with exclusive access
    ///
    /// A panic in a previous holder does not lock the controller out; the
    /// state it left is still consistent because every operation commits
    /// before notifying.
    ///
    /// Subscribers are notified while the lock is held. Neither `f` nor a
    /// subscriber may call `with` or `snapshot` on the same handle, the
    /// mutex is not reentrant and the thread would deadlock. Subscribers
    /// that need the controller use [`try_with`](Self::try_with).
    pub fn with<T>(&self, f: impl FnOnce(&mut PlaybackController) -> T) -> T {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Run `f` only if no other operation is in progress
    ///
    /// Returns `None` instead of blocking when the lock is held, including
    /// when called from a subscriber during notification.
    pub fn try_with<T>(&self, f: impl FnOnce(&mut PlaybackController) -> T) -> Option<T> {
        match self.inner.try_lock() {
            Ok(mut guard) => Some(f(&mut guard)),
            Err(TryLockError::Poisoned(poisoned)) => Some(f(&mut poisoned.into_inner())),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    /// Current state as delivered to subscribers
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.with(|controller| controller.snapshot())
    }
}
