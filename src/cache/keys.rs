//! Cache key definitions.
//!
//! A resolved cascade is keyed by `(kind, handle, locale)`. Invalidation
//! selectors are deliberately coarser: events carry no locale, so they
//! match every locale of a set. Over-invalidation is acceptable,
//! under-invalidation is not.

use crate::domain::DefaultsKind;

/// Key of one resolved, filtered cascade in the scope cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedKey {
    pub kind: DefaultsKind,
    pub handle: String,
    pub locale: String,
}

impl ResolvedKey {
    pub fn new(kind: DefaultsKind, handle: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            kind,
            handle: handle.into(),
            locale: locale.into(),
        }
    }
}

/// Which cached cascades an invalidating event affects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeySelector {
    /// Every locale of one defaults set.
    Set { kind: DefaultsKind, handle: String },
    /// Everything. Used when a site-level set changes, since the site
    /// layer feeds every cascade.
    All,
}

impl KeySelector {
    pub fn set(kind: DefaultsKind, handle: impl Into<String>) -> Self {
        Self::Set {
            kind,
            handle: handle.into(),
        }
    }

    pub fn matches(&self, key: &ResolvedKey) -> bool {
        match self {
            KeySelector::Set { kind, handle } => key.kind == *kind && key.handle == *handle,
            KeySelector::All => true,
        }
    }
}
