//! Defaults sets and their localized slices.
//!
//! A `DefaultsSet` is owned by one site or one content type and holds one
//! `LocalizedDefaults` per configured locale. Structural locale changes go
//! through [`DefaultsSet::sync_sites`], which never touches field values of
//! surviving locales.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::DefaultsKind;

/// Ordered field-name → raw-value mapping.
///
/// `Value::Null` (or absence) means "defer to the next cascade layer";
/// an explicitly-set empty string is a real value.
pub type FieldMap = BTreeMap<String, Value>;

/// One locale's slice of a defaults set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedDefaults {
    data: FieldMap,
}

impl LocalizedDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(data: FieldMap) -> Self {
        Self { data }
    }

    /// The raw value for `handle`, treating nulls as unset.
    pub fn value(&self, handle: &str) -> Option<&Value> {
        self.data.get(handle).filter(|value| !value.is_null())
    }

    pub fn set(&mut self, handle: impl Into<String>, value: Value) {
        self.data.insert(handle.into(), value);
    }

    pub fn remove(&mut self, handle: &str) -> Option<Value> {
        self.data.remove(handle)
    }

    pub fn data(&self) -> &FieldMap {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Locales added and removed by one [`DefaultsSet::sync_sites`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl SyncOutcome {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// The full localized default-value bundle for one `(kind, handle)` owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsSet {
    kind: DefaultsKind,
    pub(crate) handle: String,
    localizations: BTreeMap<String, LocalizedDefaults>,
}

impl DefaultsSet {
    pub fn new(kind: DefaultsKind, handle: impl Into<String>) -> Self {
        Self {
            kind,
            handle: handle.into(),
            localizations: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> DefaultsKind {
        self.kind
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.localizations.keys().map(String::as_str)
    }

    pub fn in_locale(&self, locale: &str) -> Option<&LocalizedDefaults> {
        self.localizations.get(locale)
    }

    pub fn in_locale_mut(&mut self, locale: &str) -> Option<&mut LocalizedDefaults> {
        self.localizations.get_mut(locale)
    }

    /// Get or create the slice for `locale`.
    pub fn ensure_locale(&mut self, locale: impl Into<String>) -> &mut LocalizedDefaults {
        self.localizations.entry(locale.into()).or_default()
    }

    /// The non-null value of `handle` in `locale`, if any.
    pub fn value(&self, locale: &str, handle: &str) -> Option<&Value> {
        self.in_locale(locale).and_then(|slice| slice.value(handle))
    }

    /// Mirror the locale set onto `sites`.
    ///
    /// Adds an empty slice for each site without one and drops slices for
    /// sites no longer configured. Surviving slices are untouched, so a
    /// removed-then-re-added locale comes back empty. Idempotent.
    pub fn sync_sites<S: AsRef<str>>(&mut self, sites: &[S]) -> SyncOutcome {
        let mut outcome = SyncOutcome::default();

        for site in sites {
            let site = site.as_ref();
            if !self.localizations.contains_key(site) {
                self.localizations
                    .insert(site.to_string(), LocalizedDefaults::new());
                outcome.added.push(site.to_string());
            }
        }

        let stale: Vec<String> = self
            .localizations
            .keys()
            .filter(|locale| !sites.iter().any(|site| site.as_ref() == locale.as_str()))
            .cloned()
            .collect();
        for locale in stale {
            self.localizations.remove(&locale);
            outcome.removed.push(locale);
        }

        outcome
    }
}
