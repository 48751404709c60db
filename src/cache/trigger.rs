//! Cache trigger service.
//!
//! The entry point hosts call from their write hooks: publishes a
//! lifecycle event and, by default, consumes the queue immediately so the
//! next resolution within the same process sees fresh state.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::application::repos::RepoError;
use crate::config::CacheSettings;
use crate::domain::DefaultsKind;

use super::consumer::CacheConsumer;
use super::events::{EventKind, EventQueue};

pub struct CacheTrigger {
    settings: CacheSettings,
    queue: Arc<EventQueue>,
    consumer: Arc<CacheConsumer>,
}

impl CacheTrigger {
    pub fn new(
        settings: CacheSettings,
        queue: Arc<EventQueue>,
        consumer: Arc<CacheConsumer>,
    ) -> Self {
        Self {
            settings,
            queue,
            consumer,
        }
    }

    /// Publish an event and optionally consume immediately.
    pub fn trigger(&self, kind: EventKind, consume_now: bool) -> Result<(), RepoError> {
        if !self.settings.enabled {
            debug!(event_kind = ?kind, "Trigger skipped: invalidation pipeline disabled");
            return Ok(());
        }

        self.queue.publish(kind);

        if consume_now {
            self.consumer.consume()?;
        }
        Ok(())
    }

    pub fn defaults_saved(&self, kind: DefaultsKind, handle: &str) -> Result<(), RepoError> {
        self.trigger(
            EventKind::DefaultsSaved {
                kind,
                handle: handle.to_string(),
            },
            true,
        )
    }

    pub fn collection_saved(&self, handle: &str, sites: &[String]) -> Result<(), RepoError> {
        self.trigger(
            EventKind::CollectionSaved {
                handle: handle.to_string(),
                sites: sites.to_vec(),
            },
            true,
        )
    }

    pub fn collection_deleted(&self, handle: &str) -> Result<(), RepoError> {
        self.trigger(
            EventKind::CollectionDeleted {
                handle: handle.to_string(),
            },
            true,
        )
    }

    pub fn taxonomy_saved(&self, handle: &str, sites: &[String]) -> Result<(), RepoError> {
        self.trigger(
            EventKind::TaxonomySaved {
                handle: handle.to_string(),
                sites: sites.to_vec(),
            },
            true,
        )
    }

    pub fn taxonomy_deleted(&self, handle: &str) -> Result<(), RepoError> {
        self.trigger(
            EventKind::TaxonomyDeleted {
                handle: handle.to_string(),
            },
            true,
        )
    }

    pub fn entry_saved(&self, id: Uuid, collection: &str, locale: &str) -> Result<(), RepoError> {
        self.trigger(
            EventKind::EntrySaved {
                id,
                collection: collection.to_string(),
                locale: locale.to_string(),
            },
            true,
        )
    }

    pub fn entry_deleted(&self, id: Uuid, collection: &str, locale: &str) -> Result<(), RepoError> {
        self.trigger(
            EventKind::EntryDeleted {
                id,
                collection: collection.to_string(),
                locale: locale.to_string(),
            },
            true,
        )
    }

    pub fn term_saved(&self, taxonomy: &str, locale: &str) -> Result<(), RepoError> {
        self.trigger(
            EventKind::TermSaved {
                taxonomy: taxonomy.to_string(),
                locale: locale.to_string(),
            },
            true,
        )
    }

    pub fn term_deleted(&self, taxonomy: &str, locale: &str) -> Result<(), RepoError> {
        self.trigger(
            EventKind::TermDeleted {
                taxonomy: taxonomy.to_string(),
                locale: locale.to_string(),
            },
            true,
        )
    }

    pub fn queue(&self) -> &Arc<EventQueue> {
        &self.queue
    }

    pub fn consumer(&self) -> &Arc<CacheConsumer> {
        &self.consumer
    }
}
