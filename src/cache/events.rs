//! Lifecycle event system.
//!
//! Explicit message objects for the content-lifecycle notifications that
//! drive localization sync and cache invalidation, plus an in-memory queue
//! decoupled from any host event bus.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::domain::DefaultsKind;
use crate::util::lock::mutex_lock;

const SOURCE: &str = "cache::events";

/// Monotonic epoch for ordering events.
///
/// Each event gets a unique, monotonically increasing epoch number, used
/// to determine which event is "latest" when merging multiple events for
/// the same defaults set.
pub type Epoch = u64;

/// Lifecycle event with idempotency and ordering support.
#[derive(Debug, Clone)]
pub struct LifecycleEvent {
    /// Unique identifier for idempotency (UUIDv4).
    pub id: Uuid,
    /// Monotonic epoch for ordering within this process.
    pub epoch: Epoch,
    /// The type of lifecycle event.
    pub kind: EventKind,
    /// When the event was created.
    pub timestamp: OffsetDateTime,
}

impl LifecycleEvent {
    pub fn new(kind: EventKind, epoch: Epoch) -> Self {
        Self {
            id: Uuid::new_v4(),
            epoch,
            kind,
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

/// Types of lifecycle events that change a cascade's outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A defaults set was saved (any locale).
    DefaultsSaved { kind: DefaultsKind, handle: String },

    // Content-type containers: a site-list change restructures the
    // matching defaults set, a delete removes it entirely.
    CollectionSaved { handle: String, sites: Vec<String> },
    CollectionDeleted { handle: String },
    TaxonomySaved { handle: String, sites: Vec<String> },
    TaxonomyDeleted { handle: String },

    // Content items contributing a cascade layer.
    EntrySaved { id: Uuid, collection: String, locale: String },
    EntryDeleted { id: Uuid, collection: String, locale: String },
    TermSaved { taxonomy: String, locale: String },
    TermDeleted { taxonomy: String, locale: String },
}

/// In-memory lifecycle event queue.
///
/// Events are published by write hooks and drained by the cache consumer.
/// A mutex is enough since contention is expected to be low.
pub struct EventQueue {
    queue: Mutex<VecDeque<LifecycleEvent>>,
    epoch_counter: AtomicU64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            epoch_counter: AtomicU64::new(0),
        }
    }

    /// Get the next epoch number.
    pub fn next_epoch(&self) -> Epoch {
        self.epoch_counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Publish an event to the queue.
    pub fn publish(&self, kind: EventKind) {
        let epoch = self.next_epoch();
        let event = LifecycleEvent::new(kind.clone(), epoch);

        info!(
            event_id = %event.id,
            event_epoch = event.epoch,
            event_kind = ?kind,
            "Lifecycle event enqueued"
        );

        mutex_lock(&self.queue, SOURCE, "publish").push_back(event);
    }

    /// Drain up to `limit` events in FIFO order.
    pub fn drain(&self, limit: usize) -> Vec<LifecycleEvent> {
        let mut queue = mutex_lock(&self.queue, SOURCE, "drain");
        let count = limit.min(queue.len());
        queue.drain(..count).collect()
    }

    pub fn len(&self) -> usize {
        mutex_lock(&self.queue, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        mutex_lock(&self.queue, SOURCE, "clear").clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
