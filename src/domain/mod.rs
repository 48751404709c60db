//! Domain model: defaults sets, the field schema, and content variants.

pub mod content;
pub mod defaults;
pub mod schema;
pub mod types;

pub use content::{Content, EntryRecord, TaxonomyRecord, TermRecord};
pub use defaults::{DefaultsSet, FieldMap, LocalizedDefaults, SyncOutcome};
pub use types::{CanonicalType, ChangeFrequency, DefaultsKind};
