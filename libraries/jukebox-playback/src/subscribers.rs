//! Subscriber registry
//!
//! Observers register an `Arc` they keep owning; the registry only holds a
//! `Weak` to it. Dropping the `Arc` is enough to stop receiving snapshots,
//! dead entries are pruned on the next notify.
//!
//! Registering the same `Arc` twice is deduplicated: the second call returns
//! the id of the existing registration and the observer is still notified
//! once per snapshot.

use crate::error::SubscriberError;
use crate::events::PlaybackSnapshot;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

/// Receiver of playback snapshots
pub trait PlaybackSubscriber: Send + Sync {
    /// Called synchronously with every published snapshot
    ///
    /// Runs while the controller is mid-operation. Under a
    /// [`SharedController`](crate::SharedController) the lock is held, so an
    /// implementation must not call `with` on that same handle: it would
    /// deadlock. `try_with` returns `None` instead.
    fn update(&self, snapshot: &PlaybackSnapshot) -> Result<(), SubscriberError>;
}

impl<F> PlaybackSubscriber for F
where
    F: Fn(&PlaybackSnapshot) -> Result<(), SubscriberError> + Send + Sync,
{
    fn update(&self, snapshot: &PlaybackSnapshot) -> Result<(), SubscriberError> {
        self(snapshot)
    }
}

/// Handle returned by [`SubscriberRegistry::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscriber-{}", self.0)
    }
}

/// One subscriber that failed during a notify
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub subscriber: SubscriberId,
    pub message: String,
}

/// Outcome of a notify fan-out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Subscribers whose callback returned `Ok`
    pub delivered: usize,

    /// Subscribers whose callback failed or panicked
    pub failures: Vec<DeliveryFailure>,

    /// Entries dropped because their owner released the subscriber
    pub pruned: usize,
}

impl DeliveryReport {
    /// True when every live subscriber accepted the snapshot
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

struct Entry {
    id: SubscriberId,
    address: usize,
    handle: Weak<dyn PlaybackSubscriber>,
}

/// Ordered set of weakly-held subscribers
#[derive(Default)]
pub struct SubscriberRegistry {
    entries: Vec<Entry>,
    next_id: u64,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber
    pub fn subscribe<S: PlaybackSubscriber + 'static>(
        &mut self,
        subscriber: &Arc<S>,
    ) -> SubscriberId {
        let handle: Arc<dyn PlaybackSubscriber> = subscriber.clone();
        self.subscribe_dyn(&handle)
    }

    /// Register an already type-erased subscriber
    pub fn subscribe_dyn(&mut self, subscriber: &Arc<dyn PlaybackSubscriber>) -> SubscriberId {
        self.prune();

        let address = address_of(subscriber);
        if let Some(existing) = self.entries.iter().find(|entry| entry.address == address) {
            debug!(subscriber = %existing.id, "Subscriber already registered");
            return existing.id;
        }

        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            address,
            handle: Arc::downgrade(subscriber),
        });
        debug!(subscriber = %id, total = self.entries.len(), "Subscriber registered");
        id
    }

    /// Remove a subscriber; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        let removed = self.entries.len() != before;
        if removed {
            debug!(subscriber = %id, "Subscriber removed");
        }
        removed
    }

    /// Deliver `snapshot` to every live subscriber in registration order
    ///
    /// Failures are isolated: a subscriber that errors or panics does not
    /// stop delivery to the rest. They are logged as one batched warning
    /// and returned in the report.
    pub fn notify(&mut self, snapshot: &PlaybackSnapshot) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for entry in &self.entries {
            let Some(subscriber) = entry.handle.upgrade() else {
                continue;
            };

            let outcome = catch_unwind(AssertUnwindSafe(|| subscriber.update(snapshot)));
            match outcome {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(err)) => report.failures.push(DeliveryFailure {
                    subscriber: entry.id,
                    message: err.to_string(),
                }),
                Err(panic) => report.failures.push(DeliveryFailure {
                    subscriber: entry.id,
                    message: panic_message(panic.as_ref()),
                }),
            }
        }

        report.pruned = self.prune();

        if !report.is_clean() {
            let details: Vec<String> = report
                .failures
                .iter()
                .map(|failure| format!("{}: {}", failure.subscriber, failure.message))
                .collect();
            warn!(
                failed = report.failures.len(),
                delivered = report.delivered,
                "Subscriber notification failures: {}",
                details.join("; ")
            );
        }

        report
    }

    /// Number of live subscribers
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.handle.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.handle.strong_count() > 0);
        before - self.entries.len()
    }
}

impl fmt::Debug for SubscriberRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberRegistry")
            .field(
                "subscribers",
                &self.entries.iter().map(|e| e.id).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn address_of(subscriber: &Arc<dyn PlaybackSubscriber>) -> usize {
    Arc::as_ptr(subscriber).cast::<()>() as usize
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        format!("panicked: {}", msg)
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        format!("panicked: {}", msg)
    } else {
        "panicked".to_string()
    }
}
