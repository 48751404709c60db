//! Social-image generation gate.
//!
//! Decides whether saving an entry should queue an image-generation job.
//! The answer is a strict conjunction: the feature must be enabled, the
//! save path must allow automatic generation, the entry's collection must
//! be listed in the site-level `social_media` defaults set, and the
//! per-entry flag (own value, else cascade default) must resolve true.

use tracing::info;

use crate::cache::ResolverCache;
use crate::config::SocialImagesSettings;
use crate::domain::{DefaultsKind, EntryRecord, schema::fields};
use crate::util::value::truthy;

use super::jobs::{JobDescriptor, JobOutbox};
use super::repos::{DefaultsRepo, RepoError};
use super::resolver::DefaultsResolver;

/// Handle of the site-kind defaults set holding social-image settings.
pub const SOCIAL_MEDIA_SET: &str = "social_media";

/// Which save path is asking.
///
/// `OnSave` is the automatic path and respects the on-demand deferral;
/// `Queued` is the explicit path (a queued regeneration request) and
/// skips that check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateTrigger {
    OnSave,
    Queued,
}

pub struct SocialImageGate<'a> {
    settings: &'a SocialImagesSettings,
    defaults: &'a dyn DefaultsRepo,
    cache: &'a ResolverCache,
}

impl<'a> SocialImageGate<'a> {
    pub fn new(
        settings: &'a SocialImagesSettings,
        defaults: &'a dyn DefaultsRepo,
        cache: &'a ResolverCache,
    ) -> Self {
        Self {
            settings,
            defaults,
            cache,
        }
    }

    pub fn should_generate(
        &self,
        entry: &EntryRecord,
        trigger: GateTrigger,
    ) -> Result<bool, RepoError> {
        if !self.settings.enabled {
            return Ok(false);
        }
        if trigger == GateTrigger::OnSave && self.settings.generate_on_demand {
            return Ok(false);
        }
        if !self.collection_eligible(&entry.collection, &entry.locale)? {
            return Ok(false);
        }

        // Own flag wins when explicitly set; null defers like any cascade
        // field.
        if let Some(own) = entry
            .fields
            .get(fields::GENERATE_SOCIAL_IMAGES)
            .filter(|value| !value.is_null())
        {
            return Ok(truthy(own));
        }

        let resolver = DefaultsResolver::new(self.defaults, self.cache);
        let resolved = resolver.resolve(
            DefaultsKind::Collections,
            &entry.collection,
            &entry.locale,
            None,
        )?;
        Ok(resolved
            .get(fields::GENERATE_SOCIAL_IMAGES)
            .map(truthy)
            .unwrap_or(false))
    }

    /// Run the gate and hand the job descriptor to the outbox on a yes.
    ///
    /// Returns whether a job was queued. The outbox call is synchronous;
    /// execution and retries belong to the host's job system.
    pub fn maybe_enqueue(
        &self,
        entry: &EntryRecord,
        trigger: GateTrigger,
        outbox: &dyn JobOutbox,
    ) -> Result<bool, RepoError> {
        if !self.should_generate(entry, trigger)? {
            return Ok(false);
        }

        outbox.enqueue(JobDescriptor::GenerateSocialImage {
            entry_id: entry.id,
            site: entry.locale.clone(),
        })?;
        info!(
            entry_id = %entry.id,
            collection = %entry.collection,
            site = %entry.locale,
            "Queued social-image generation"
        );
        Ok(true)
    }

    fn collection_eligible(&self, collection: &str, locale: &str) -> Result<bool, RepoError> {
        let resolver = DefaultsResolver::new(self.defaults, self.cache);
        let resolved = resolver.resolve(DefaultsKind::Site, SOCIAL_MEDIA_SET, locale, None)?;

        let Some(serde_json::Value::Array(listed)) = resolved.get(fields::GENERATOR_COLLECTIONS)
        else {
            return Ok(false);
        };
        Ok(listed
            .iter()
            .filter_map(serde_json::Value::as_str)
            .any(|handle| handle == collection))
    }
}
