//! In-memory reference adapters.
//!
//! Thread-safe map-backed implementations of the collaborator traits.
//! They are the adapters the test suite runs against and a reasonable
//! starting point for hosts without a real store yet. Counters on the
//! defaults repo expose store traffic so tests can assert write
//! atomicity and cache hit behavior.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use uuid::Uuid;

use crate::application::jobs::{JobDescriptor, JobOutbox};
use crate::application::repos::{
    ContentsRepo, DefaultsRepo, EntriesRepo, RepoError, TermsRepo,
};
use crate::domain::{Content, DefaultsKind, DefaultsSet, EntryRecord, TermRecord};
use crate::util::lock::{rw_read, rw_write};

const SOURCE: &str = "infra::memory";

#[derive(Default)]
pub struct MemoryDefaultsRepo {
    sets: RwLock<BTreeMap<(DefaultsKind, String), DefaultsSet>>,
    loads: AtomicUsize,
    saves: AtomicUsize,
}

impl MemoryDefaultsRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `load`/`load_all` calls served so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    /// Number of `save` calls served so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }
}

impl DefaultsRepo for MemoryDefaultsRepo {
    fn load(&self, kind: DefaultsKind, handle: &str) -> Result<Option<DefaultsSet>, RepoError> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        Ok(rw_read(&self.sets, SOURCE, "defaults.load")
            .get(&(kind, handle.to_string()))
            .cloned())
    }

    fn load_all(&self, kind: DefaultsKind) -> Result<Vec<DefaultsSet>, RepoError> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        // BTreeMap iteration keeps the handle order deterministic.
        Ok(rw_read(&self.sets, SOURCE, "defaults.load_all")
            .iter()
            .filter(|((set_kind, _), _)| *set_kind == kind)
            .map(|(_, set)| set.clone())
            .collect())
    }

    fn save(&self, set: &DefaultsSet) -> Result<(), RepoError> {
        self.saves.fetch_add(1, Ordering::Relaxed);
        rw_write(&self.sets, SOURCE, "defaults.save")
            .insert((set.kind(), set.handle().to_string()), set.clone());
        Ok(())
    }

    fn delete(&self, kind: DefaultsKind, handle: &str) -> Result<(), RepoError> {
        rw_write(&self.sets, SOURCE, "defaults.delete").remove(&(kind, handle.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryEntriesRepo {
    entries: RwLock<HashMap<Uuid, EntryRecord>>,
}

impl MemoryEntriesRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, entry: EntryRecord) {
        rw_write(&self.entries, SOURCE, "entries.insert").insert(entry.id, entry);
    }
}

impl EntriesRepo for MemoryEntriesRepo {
    fn find_entry(&self, id: Uuid) -> Result<Option<EntryRecord>, RepoError> {
        Ok(rw_read(&self.entries, SOURCE, "entries.find").get(&id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryTermsRepo {
    terms: RwLock<Vec<TermRecord>>,
}

impl MemoryTermsRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, term: TermRecord) {
        rw_write(&self.terms, SOURCE, "terms.insert").push(term);
    }
}

impl TermsRepo for MemoryTermsRepo {
    fn list_terms(&self, taxonomy: &str, site: &str) -> Result<Vec<TermRecord>, RepoError> {
        Ok(rw_read(&self.terms, SOURCE, "terms.list")
            .iter()
            .filter(|term| term.taxonomy == taxonomy && term.locale == site)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryContentsRepo {
    contents: RwLock<HashMap<String, Vec<Content>>>,
}

impl MemoryContentsRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, site: &str, content: Content) {
        rw_write(&self.contents, SOURCE, "contents.insert")
            .entry(site.to_string())
            .or_default()
            .push(content);
    }
}

impl ContentsRepo for MemoryContentsRepo {
    fn list_for_site(&self, site: &str) -> Result<Vec<Content>, RepoError> {
        Ok(rw_read(&self.contents, SOURCE, "contents.list")
            .get(site)
            .cloned()
            .unwrap_or_default())
    }
}

/// Records enqueued jobs instead of running them.
#[derive(Default)]
pub struct RecordingOutbox {
    queued: RwLock<Vec<JobDescriptor>>,
}

impl RecordingOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> Vec<JobDescriptor> {
        rw_read(&self.queued, SOURCE, "outbox.jobs").clone()
    }
}

impl JobOutbox for RecordingOutbox {
    fn enqueue(&self, job: JobDescriptor) -> Result<(), RepoError> {
        rw_write(&self.queued, SOURCE, "outbox.enqueue").push(job);
        Ok(())
    }
}
