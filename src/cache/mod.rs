//! Resolver cache and invalidation protocol.
//!
//! - **Store**: scope-local memoization of resolved cascades, keyed by
//!   `(kind, handle, locale)`, plus cached per-site sitemaps.
//! - **Events → planner → consumer**: write hooks publish explicit
//!   lifecycle messages; the consumer merges them into a coarse
//!   invalidation plan and applies structural defaults-set changes before
//!   dropping cache entries.

mod consumer;
mod events;
mod keys;
mod planner;
mod store;
mod trigger;

pub use consumer::{CacheConsumer, ConsumeReport};
pub use events::{Epoch, EventKind, EventQueue, LifecycleEvent};
pub use keys::{KeySelector, ResolvedKey};
pub use planner::{InvalidationPlan, SyncAction};
pub use store::ResolverCache;
pub use trigger::CacheTrigger;
