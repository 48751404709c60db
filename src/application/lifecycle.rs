//! Localization lifecycle for defaults sets.
//!
//! Keeps a defaults set structurally in sync with the sites its content
//! type is configured for. Field data of surviving locales is never
//! touched; each sync is one atomic store write.

use tracing::info;

use crate::domain::{DefaultsKind, DefaultsSet, SyncOutcome};

use super::repos::{DefaultsRepo, RepoError};

pub struct LocalizationLifecycle<'a> {
    defaults: &'a dyn DefaultsRepo,
}

impl<'a> LocalizationLifecycle<'a> {
    pub fn new(defaults: &'a dyn DefaultsRepo) -> Self {
        Self { defaults }
    }

    /// Mirror the set's locales onto `sites`, creating the set on first
    /// contact.
    ///
    /// Idempotent: a second call with the same sites performs no store
    /// write. The whole set is saved in one `DefaultsRepo::save`, so a
    /// failing write leaves the stored set untouched rather than
    /// half-synced.
    pub fn sync_localizations(
        &self,
        kind: DefaultsKind,
        handle: &str,
        sites: &[String],
    ) -> Result<SyncOutcome, RepoError> {
        let existing = self.defaults.load(kind, handle)?;
        let created = existing.is_none();
        let mut set = existing.unwrap_or_else(|| DefaultsSet::new(kind, handle));

        let outcome = set.sync_sites(sites);
        if created || !outcome.is_noop() {
            self.defaults.save(&set)?;
            info!(
                kind = kind.as_str(),
                handle,
                added = outcome.added.len(),
                removed = outcome.removed.len(),
                created,
                "Synced defaults-set localizations"
            );
        }

        Ok(outcome)
    }

    /// Remove the whole defaults set. Unconditional and not reversible.
    pub fn delete_all(&self, kind: DefaultsKind, handle: &str) -> Result<(), RepoError> {
        self.defaults.delete(kind, handle)?;
        info!(kind = kind.as_str(), handle, "Deleted defaults set");
        Ok(())
    }
}
