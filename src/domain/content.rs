//! Content variants feeding the cascade and the sitemap.
//!
//! A closed tagged union over the three content shapes the core consumes:
//! ordinary entries, taxonomy containers, and taxonomy terms. All dispatch
//! is exhaustive matching; adding a variant breaks compilation at every
//! dispatch site.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::defaults::FieldMap;
use super::types::DefaultsKind;

/// An entry of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: Uuid,
    pub collection: String,
    pub locale: String,
    pub fields: FieldMap,
    pub absolute_url: String,
    pub last_modified: OffsetDateTime,
}

/// A taxonomy container.
///
/// The absolute URL differs per site, so the record carries one URL per
/// configured site. `updated_at` is the container's own modification time,
/// used as the lastmod fallback when a site has no terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyRecord {
    pub handle: String,
    pub sites: Vec<String>,
    pub absolute_urls: BTreeMap<String, String>,
    pub updated_at: Option<OffsetDateTime>,
}

/// A localized taxonomy term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermRecord {
    pub id: Uuid,
    pub slug: String,
    pub taxonomy: String,
    pub locale: String,
    pub fields: FieldMap,
    pub absolute_url: String,
    pub last_modified: OffsetDateTime,
}

/// One content item as seen by the resolver and the sitemap builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Content {
    Entry(EntryRecord),
    Taxonomy(TaxonomyRecord),
    Term(TermRecord),
}

impl Content {
    /// The defaults-set kind this content resolves against.
    pub fn defaults_kind(&self) -> DefaultsKind {
        match self {
            Content::Entry(_) => DefaultsKind::Collections,
            Content::Taxonomy(_) => DefaultsKind::Taxonomies,
            Content::Term(_) => DefaultsKind::Taxonomies,
        }
    }

    /// The defaults-set handle: the container's handle for entries and
    /// terms, the taxonomy's own handle for containers.
    pub fn handle(&self) -> &str {
        match self {
            Content::Entry(entry) => &entry.collection,
            Content::Taxonomy(taxonomy) => &taxonomy.handle,
            Content::Term(term) => &term.taxonomy,
        }
    }

    /// The content's own field layer for the cascade.
    ///
    /// Terms and taxonomy containers have no override layer of their own in
    /// the sitemap path; only entries contribute one.
    pub fn cascade_fields(&self) -> Option<&FieldMap> {
        match self {
            Content::Entry(entry) => Some(&entry.fields),
            Content::Taxonomy(_) => None,
            Content::Term(_) => None,
        }
    }

    /// The absolute URL for `site`, if the content has one there.
    pub fn absolute_url(&self, site: &str) -> Option<&str> {
        match self {
            Content::Entry(entry) => Some(entry.absolute_url.as_str()),
            Content::Taxonomy(taxonomy) => {
                taxonomy.absolute_urls.get(site).map(String::as_str)
            }
            Content::Term(term) => Some(term.absolute_url.as_str()),
        }
    }
}
