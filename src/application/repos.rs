//! Collaborator traits describing the storage and queue adapters.
//!
//! The core never owns persistence. Hosts implement these against their
//! own stores; `infra::memory` ships in-memory reference adapters.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Content, DefaultsKind, DefaultsSet, EntryRecord, TermRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Store for defaults sets.
///
/// `save` must replace the whole set atomically so locale-level add/remove
/// never leaves a set half-synced.
pub trait DefaultsRepo: Send + Sync {
    fn load(&self, kind: DefaultsKind, handle: &str) -> Result<Option<DefaultsSet>, RepoError>;

    /// All sets of one kind, ordered by handle.
    fn load_all(&self, kind: DefaultsKind) -> Result<Vec<DefaultsSet>, RepoError>;

    fn save(&self, set: &DefaultsSet) -> Result<(), RepoError>;

    fn delete(&self, kind: DefaultsKind, handle: &str) -> Result<(), RepoError>;
}

/// Read access to entries, for canonical `other` references.
pub trait EntriesRepo: Send + Sync {
    fn find_entry(&self, id: Uuid) -> Result<Option<EntryRecord>, RepoError>;
}

/// Read access to taxonomy terms.
pub trait TermsRepo: Send + Sync {
    fn list_terms(&self, taxonomy: &str, site: &str) -> Result<Vec<TermRecord>, RepoError>;
}

/// Per-site content feed for sitemap rendering.
pub trait ContentsRepo: Send + Sync {
    fn list_for_site(&self, site: &str) -> Result<Vec<Content>, RepoError>;
}
