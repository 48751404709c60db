//! Lifecycle event consumer.
//!
//! Drains the event queue in batches, merges each batch into an
//! [`InvalidationPlan`], and applies it: structural defaults-set changes
//! first (so recomputes see the new locale layout), then cache
//! invalidation. Store write failures propagate to the caller.

use std::sync::Arc;

use tracing::info;

use crate::application::lifecycle::LocalizationLifecycle;
use crate::application::repos::{DefaultsRepo, RepoError};
use crate::config::CacheSettings;

use super::events::EventQueue;
use super::planner::InvalidationPlan;
use super::store::ResolverCache;

/// What one [`CacheConsumer::consume`] call did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConsumeReport {
    pub events: usize,
    pub invalidated: usize,
    pub synced: usize,
    pub deleted: usize,
}

pub struct CacheConsumer {
    settings: CacheSettings,
    store: Arc<ResolverCache>,
    queue: Arc<EventQueue>,
    defaults: Arc<dyn DefaultsRepo>,
}

impl CacheConsumer {
    pub fn new(
        settings: CacheSettings,
        store: Arc<ResolverCache>,
        queue: Arc<EventQueue>,
        defaults: Arc<dyn DefaultsRepo>,
    ) -> Self {
        Self {
            settings,
            store,
            queue,
            defaults,
        }
    }

    /// Drain and apply all pending events.
    pub fn consume(&self) -> Result<ConsumeReport, RepoError> {
        let mut report = ConsumeReport::default();
        let lifecycle = LocalizationLifecycle::new(self.defaults.as_ref());

        loop {
            let batch = self.queue.drain(self.settings.consume_batch_limit);
            if batch.is_empty() {
                break;
            }
            report.events += batch.len();

            let plan = InvalidationPlan::from_events(batch);
            if plan.is_empty() {
                continue;
            }
            info!(plan = %plan, "Applying invalidation plan");

            // Structural changes land before any invalidation so the next
            // resolution reads the post-sync locale layout.
            for action in &plan.sync_localizations {
                lifecycle.sync_localizations(action.kind, &action.handle, &action.sites)?;
                report.synced += 1;
            }
            for (kind, handle) in &plan.delete_defaults {
                lifecycle.delete_all(*kind, handle)?;
                report.deleted += 1;
            }

            if plan.purge_all {
                report.invalidated += self.store.resolved_len();
                self.store.invalidate_all();
            } else {
                for selector in &plan.invalidate {
                    report.invalidated += self.store.invalidate(selector);
                }
                if plan.purge_sitemaps {
                    self.store.invalidate_sitemaps();
                }
            }
        }

        Ok(report)
    }

    pub fn store(&self) -> &Arc<ResolverCache> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use serde_json::json;

    use crate::cache::events::EventKind;
    use crate::cache::keys::ResolvedKey;
    use crate::domain::{DefaultsKind, FieldMap};
    use crate::infra::memory::MemoryDefaultsRepo;

    use super::*;

    fn setup() -> (CacheConsumer, Arc<ResolverCache>, Arc<EventQueue>, Arc<MemoryDefaultsRepo>) {
        let settings = CacheSettings::default();
        let store = Arc::new(ResolverCache::new(&settings));
        let queue = Arc::new(EventQueue::new());
        let defaults = Arc::new(MemoryDefaultsRepo::new());
        let consumer = CacheConsumer::new(
            settings,
            store.clone(),
            queue.clone(),
            defaults.clone(),
        );
        (consumer, store, queue, defaults)
    }

    fn warm(store: &ResolverCache, kind: DefaultsKind, handle: &str, locale: &str) {
        store
            .get_or_compute(
                ResolvedKey::new(kind, handle, locale),
                || -> Result<FieldMap, Infallible> {
                    Ok(FieldMap::from([("seo_title".to_string(), json!("warm"))]))
                },
            )
            .unwrap();
    }

    #[test]
    fn consume_empty_queue_is_a_noop() {
        let (consumer, _, _, _) = setup();
        let report = consumer.consume().unwrap();
        assert_eq!(report, ConsumeReport::default());
    }

    #[test]
    fn entry_save_invalidates_its_collection() {
        let (consumer, store, queue, _) = setup();
        warm(&store, DefaultsKind::Collections, "articles", "en");
        warm(&store, DefaultsKind::Collections, "pages", "en");

        queue.publish(EventKind::EntrySaved {
            id: uuid::Uuid::nil(),
            collection: "articles".to_string(),
            locale: "en".to_string(),
        });
        let report = consumer.consume().unwrap();

        assert_eq!(report.events, 1);
        assert_eq!(report.invalidated, 1);
        assert_eq!(store.resolved_len(), 1);
    }

    #[test]
    fn site_defaults_save_purges_all() {
        let (consumer, store, queue, _) = setup();
        warm(&store, DefaultsKind::Collections, "articles", "en");
        warm(&store, DefaultsKind::Taxonomies, "colors", "fr");

        queue.publish(EventKind::DefaultsSaved {
            kind: DefaultsKind::Site,
            handle: "general".to_string(),
        });
        let report = consumer.consume().unwrap();

        assert_eq!(store.resolved_len(), 0);
        // The full purge is accounted for like selector invalidation.
        assert_eq!(report.invalidated, 2);
    }

    #[test]
    fn collection_save_syncs_localizations() {
        let (consumer, _, queue, defaults) = setup();

        queue.publish(EventKind::CollectionSaved {
            handle: "articles".to_string(),
            sites: vec!["en".to_string(), "fr".to_string()],
        });
        let report = consumer.consume().unwrap();

        assert_eq!(report.synced, 1);
        let set = defaults
            .load(DefaultsKind::Collections, "articles")
            .unwrap()
            .expect("set created");
        let locales: Vec<&str> = set.locales().collect();
        assert_eq!(locales, vec!["en", "fr"]);
    }

    #[test]
    fn collection_delete_removes_the_set() {
        let (consumer, _, queue, defaults) = setup();

        queue.publish(EventKind::CollectionSaved {
            handle: "articles".to_string(),
            sites: vec!["en".to_string()],
        });
        consumer.consume().unwrap();
        assert!(
            defaults
                .load(DefaultsKind::Collections, "articles")
                .unwrap()
                .is_some()
        );

        queue.publish(EventKind::CollectionDeleted {
            handle: "articles".to_string(),
        });
        let report = consumer.consume().unwrap();

        assert_eq!(report.deleted, 1);
        assert!(
            defaults
                .load(DefaultsKind::Collections, "articles")
                .unwrap()
                .is_none()
        );
    }
}
