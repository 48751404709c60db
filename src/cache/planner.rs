//! Invalidation plan generation.
//!
//! Merges a batch of lifecycle events into one deduplicated plan: which
//! cached cascades to drop, whether sitemaps must be rebuilt, and which
//! structural defaults-set changes (localization sync, deletion) have to
//! land first.

use std::collections::{HashMap, HashSet};
use std::fmt;

use super::events::{EventKind, LifecycleEvent};
use super::keys::KeySelector;
use crate::domain::DefaultsKind;

/// A pending localization sync for one defaults set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncAction {
    pub kind: DefaultsKind,
    pub handle: String,
    pub sites: Vec<String>,
}

/// Actions to execute for cache and defaults-set consistency.
///
/// Invalidation is coarse by defaults set (all locales): correctness over
/// precision.
#[derive(Debug, Default)]
pub struct InvalidationPlan {
    /// Drop every resolved cascade. Set when a site-level defaults set
    /// changed, since the site layer feeds all cascades.
    pub purge_all: bool,
    /// Drop all cached per-site sitemaps.
    pub purge_sitemaps: bool,
    /// Selectors for resolved cascades to drop.
    pub invalidate: HashSet<KeySelector>,
    /// Localization syncs to apply, ordered by (kind, handle).
    pub sync_localizations: Vec<SyncAction>,
    /// Defaults sets to delete, ordered by (kind, handle).
    pub delete_defaults: Vec<(DefaultsKind, String)>,
}

impl fmt::Display for InvalidationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "InvalidationPlan {{ purge_all: {}, purge_sitemaps: {}, invalidate: {}, \
             sync: {}, delete: {} }}",
            self.purge_all,
            self.purge_sitemaps,
            self.invalidate.len(),
            self.sync_localizations.len(),
            self.delete_defaults.len(),
        )
    }
}

impl InvalidationPlan {
    /// Merge a batch of events into one plan.
    ///
    /// - Deduplicates by event ID
    /// - Keeps only the latest container event per (kind, handle), so a
    ///   save followed by a delete plans the delete
    /// - Maps every invalidating event to its coarse selector
    pub fn from_events(events: Vec<LifecycleEvent>) -> Self {
        let mut plan = Self::default();
        let mut seen_ids = HashSet::new();

        let events: Vec<_> = events
            .into_iter()
            .filter(|e| seen_ids.insert(e.id))
            .collect();

        // Latest container event per defaults set.
        let mut container_epochs: HashMap<(DefaultsKind, String), (u64, EventKind)> =
            HashMap::new();

        for event in events {
            match &event.kind {
                EventKind::DefaultsSaved { kind, handle } => {
                    plan.purge_sitemaps = true;
                    if *kind == DefaultsKind::Site {
                        plan.purge_all = true;
                    } else {
                        plan.invalidate.insert(KeySelector::set(*kind, handle));
                    }
                }
                EventKind::CollectionSaved { handle, .. }
                | EventKind::CollectionDeleted { handle } => {
                    track_latest(
                        &mut container_epochs,
                        (DefaultsKind::Collections, handle.clone()),
                        &event,
                    );
                }
                EventKind::TaxonomySaved { handle, .. }
                | EventKind::TaxonomyDeleted { handle } => {
                    track_latest(
                        &mut container_epochs,
                        (DefaultsKind::Taxonomies, handle.clone()),
                        &event,
                    );
                }
                EventKind::EntrySaved { collection, .. }
                | EventKind::EntryDeleted { collection, .. } => {
                    plan.purge_sitemaps = true;
                    plan.invalidate
                        .insert(KeySelector::set(DefaultsKind::Collections, collection));
                }
                EventKind::TermSaved { taxonomy, .. }
                | EventKind::TermDeleted { taxonomy, .. } => {
                    plan.purge_sitemaps = true;
                    plan.invalidate
                        .insert(KeySelector::set(DefaultsKind::Taxonomies, taxonomy));
                }
            }
        }

        let mut containers: Vec<_> = container_epochs.into_iter().collect();
        containers.sort_by(|((ak, ah), _), ((bk, bh), _)| {
            ak.as_str().cmp(bk.as_str()).then_with(|| ah.cmp(bh))
        });

        for ((kind, handle), (_, latest)) in containers {
            plan.purge_sitemaps = true;
            plan.invalidate.insert(KeySelector::set(kind, &handle));
            match latest {
                EventKind::CollectionSaved { sites, .. }
                | EventKind::TaxonomySaved { sites, .. } => {
                    plan.sync_localizations.push(SyncAction {
                        kind,
                        handle,
                        sites,
                    });
                }
                EventKind::CollectionDeleted { .. } | EventKind::TaxonomyDeleted { .. } => {
                    plan.delete_defaults.push((kind, handle));
                }
                _ => {}
            }
        }

        plan
    }

    pub fn is_empty(&self) -> bool {
        !self.purge_all
            && !self.purge_sitemaps
            && self.invalidate.is_empty()
            && self.sync_localizations.is_empty()
            && self.delete_defaults.is_empty()
    }
}

fn track_latest(
    epochs: &mut HashMap<(DefaultsKind, String), (u64, EventKind)>,
    key: (DefaultsKind, String),
    event: &LifecycleEvent,
) {
    epochs
        .entry(key)
        .and_modify(|(epoch, kind)| {
            if event.epoch > *epoch {
                *epoch = event.epoch;
                *kind = event.kind.clone();
            }
        })
        .or_insert((event.epoch, event.kind.clone()));
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn make_event(kind: EventKind, epoch: u64) -> LifecycleEvent {
        LifecycleEvent::new(kind, epoch)
    }

    #[test]
    fn site_defaults_save_purges_everything() {
        let events = vec![make_event(
            EventKind::DefaultsSaved {
                kind: DefaultsKind::Site,
                handle: "general".to_string(),
            },
            0,
        )];
        let plan = InvalidationPlan::from_events(events);

        assert!(plan.purge_all);
        assert!(plan.purge_sitemaps);
        assert!(plan.invalidate.is_empty());
    }

    #[test]
    fn type_defaults_save_is_scoped() {
        let events = vec![make_event(
            EventKind::DefaultsSaved {
                kind: DefaultsKind::Collections,
                handle: "articles".to_string(),
            },
            0,
        )];
        let plan = InvalidationPlan::from_events(events);

        assert!(!plan.purge_all);
        assert!(plan.purge_sitemaps);
        assert!(
            plan.invalidate
                .contains(&KeySelector::set(DefaultsKind::Collections, "articles"))
        );
    }

    #[test]
    fn collection_save_plans_localization_sync() {
        let events = vec![make_event(
            EventKind::CollectionSaved {
                handle: "articles".to_string(),
                sites: vec!["en".to_string(), "fr".to_string()],
            },
            0,
        )];
        let plan = InvalidationPlan::from_events(events);

        assert_eq!(
            plan.sync_localizations,
            vec![SyncAction {
                kind: DefaultsKind::Collections,
                handle: "articles".to_string(),
                sites: vec!["en".to_string(), "fr".to_string()],
            }]
        );
        assert!(
            plan.invalidate
                .contains(&KeySelector::set(DefaultsKind::Collections, "articles"))
        );
        assert!(plan.purge_sitemaps);
    }

    #[test]
    fn save_then_delete_keeps_the_delete() {
        let events = vec![
            make_event(
                EventKind::TaxonomySaved {
                    handle: "colors".to_string(),
                    sites: vec!["en".to_string()],
                },
                0,
            ),
            make_event(
                EventKind::TaxonomyDeleted {
                    handle: "colors".to_string(),
                },
                1,
            ),
        ];
        let plan = InvalidationPlan::from_events(events);

        assert!(plan.sync_localizations.is_empty());
        assert_eq!(
            plan.delete_defaults,
            vec![(DefaultsKind::Taxonomies, "colors".to_string())]
        );
    }

    #[test]
    fn entry_and_term_events_invalidate_their_sets() {
        let events = vec![
            make_event(
                EventKind::EntrySaved {
                    id: Uuid::nil(),
                    collection: "articles".to_string(),
                    locale: "en".to_string(),
                },
                0,
            ),
            make_event(
                EventKind::TermDeleted {
                    taxonomy: "colors".to_string(),
                    locale: "fr".to_string(),
                },
                1,
            ),
        ];
        let plan = InvalidationPlan::from_events(events);

        assert!(
            plan.invalidate
                .contains(&KeySelector::set(DefaultsKind::Collections, "articles"))
        );
        assert!(
            plan.invalidate
                .contains(&KeySelector::set(DefaultsKind::Taxonomies, "colors"))
        );
        assert!(plan.purge_sitemaps);
        assert!(!plan.purge_all);
    }

    #[test]
    fn dedupe_by_event_id() {
        let event = make_event(
            EventKind::CollectionSaved {
                handle: "articles".to_string(),
                sites: vec!["en".to_string()],
            },
            0,
        );

        let plan = InvalidationPlan::from_events(vec![event.clone(), event]);

        assert_eq!(plan.sync_localizations.len(), 1);
    }

    #[test]
    fn is_empty() {
        assert!(InvalidationPlan::default().is_empty());

        let plan = InvalidationPlan::from_events(vec![make_event(
            EventKind::DefaultsSaved {
                kind: DefaultsKind::Site,
                handle: "general".to_string(),
            },
            0,
        )]);
        assert!(!plan.is_empty());
    }

    #[test]
    fn display_format() {
        let plan = InvalidationPlan::default();
        let display = format!("{plan}");
        assert!(display.contains("InvalidationPlan"));
        assert!(display.contains("purge_all: false"));
    }
}
