//! Sitemap item building.
//!
//! [`SitemapBuilder`] turns one content item into one [`SitemapItem`] by
//! resolving its cascade for the target site, deriving the canonical URL,
//! and formatting `lastmod`. [`SitemapService`] renders the full per-site
//! sequence, skipping disabled or broken items, and memoizes the result
//! in the cache scope until a content event purges it.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::cache::ResolverCache;
use crate::domain::{CanonicalType, ChangeFrequency, Content, FieldMap, schema, schema::fields};
use crate::util::value::{text, truthy};

use super::repos::{DefaultsRepo, EntriesRepo, RepoError, TermsRepo};
use super::resolver::DefaultsResolver;

/// ISO-8601 with mandatory offset, second precision.
const LASTMOD_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
);

#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("canonical reference points to missing entry {id}")]
    DanglingReference { id: Uuid },
    #[error("canonical type is `other` but no entry reference is set")]
    MissingCanonicalReference,
    #[error("taxonomy `{taxonomy}` has no terms and no modification time for site `{site}`")]
    NoTermsForSite { taxonomy: String, site: String },
    #[error("no absolute URL for `{handle}` in site `{site}`")]
    MissingSiteUrl { handle: String, site: String },
    #[error("failed to format lastmod timestamp")]
    Format(#[from] time::error::Format),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// One rendered sitemap row. All fields are serialization-ready strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapItem {
    pub path: String,
    pub loc: String,
    pub lastmod: String,
    pub changefreq: String,
    pub priority: String,
}

pub struct SitemapBuilder<'a> {
    resolver: DefaultsResolver<'a>,
    entries: &'a dyn EntriesRepo,
    terms: &'a dyn TermsRepo,
}

impl<'a> SitemapBuilder<'a> {
    pub fn new(
        defaults: &'a dyn DefaultsRepo,
        entries: &'a dyn EntriesRepo,
        terms: &'a dyn TermsRepo,
        cache: &'a ResolverCache,
    ) -> Self {
        Self {
            resolver: DefaultsResolver::new(defaults, cache),
            entries,
            terms,
        }
    }

    pub fn build(&self, content: &Content, site: &str) -> Result<SitemapItem, SitemapError> {
        let resolved = self.resolver.resolve(
            content.defaults_kind(),
            content.handle(),
            site,
            content.cascade_fields(),
        )?;

        let loc = self.canonical_url(content, site, &resolved)?;
        let lastmod = self.lastmod(content, site)?.format(LASTMOD_FORMAT)?;

        // Containers carry no per-item or per-type override for these two.
        let (changefreq, priority) = if matches!(content, Content::Taxonomy(_)) {
            (
                schema_text(fields::SITEMAP_CHANGE_FREQUENCY),
                schema_text(fields::SITEMAP_PRIORITY),
            )
        } else {
            (
                changefreq_text(&resolved),
                resolved_text(&resolved, fields::SITEMAP_PRIORITY),
            )
        };

        Ok(SitemapItem {
            path: url_path(&loc),
            loc,
            lastmod,
            changefreq,
            priority,
        })
    }

    fn canonical_url(
        &self,
        content: &Content,
        site: &str,
        resolved: &FieldMap,
    ) -> Result<String, SitemapError> {
        // Containers never override their computed URL.
        if matches!(content, Content::Taxonomy(_)) {
            return own_url(content, site);
        }

        // Unknown stored variants resolve as `self` (schema drift tolerance).
        let canonical = resolved
            .get(fields::CANONICAL_TYPE)
            .and_then(Value::as_str)
            .and_then(|raw| CanonicalType::try_from(raw).ok())
            .unwrap_or(CanonicalType::SelfUrl);

        match canonical {
            CanonicalType::SelfUrl => own_url(content, site),
            CanonicalType::Custom => match resolved
                .get(fields::CANONICAL_CUSTOM)
                .and_then(Value::as_str)
            {
                Some(custom) if !custom.is_empty() => Ok(custom.to_string()),
                _ => own_url(content, site),
            },
            CanonicalType::Other => {
                let raw = resolved
                    .get(fields::CANONICAL_ENTRY)
                    .and_then(Value::as_str)
                    .ok_or(SitemapError::MissingCanonicalReference)?;
                let id = Uuid::parse_str(raw)
                    .map_err(|_| SitemapError::MissingCanonicalReference)?;
                let entry = self
                    .entries
                    .find_entry(id)?
                    .ok_or(SitemapError::DanglingReference { id })?;
                Ok(entry.absolute_url)
            }
        }
    }

    fn lastmod(&self, content: &Content, site: &str) -> Result<OffsetDateTime, SitemapError> {
        match content {
            Content::Entry(entry) => Ok(entry.last_modified),
            Content::Term(term) => Ok(term.last_modified),
            Content::Taxonomy(taxonomy) => {
                let terms = self.terms.list_terms(&taxonomy.handle, site)?;
                terms
                    .iter()
                    .map(|term| term.last_modified)
                    .max()
                    .or(taxonomy.updated_at)
                    .ok_or_else(|| SitemapError::NoTermsForSite {
                        taxonomy: taxonomy.handle.clone(),
                        site: site.to_string(),
                    })
            }
        }
    }
}

/// Renders the whole sitemap of one site, with per-site memoization.
pub struct SitemapService<'a> {
    defaults: &'a dyn DefaultsRepo,
    entries: &'a dyn EntriesRepo,
    terms: &'a dyn TermsRepo,
    contents: &'a dyn super::repos::ContentsRepo,
    cache: &'a ResolverCache,
}

impl<'a> SitemapService<'a> {
    pub fn new(
        defaults: &'a dyn DefaultsRepo,
        entries: &'a dyn EntriesRepo,
        terms: &'a dyn TermsRepo,
        contents: &'a dyn super::repos::ContentsRepo,
        cache: &'a ResolverCache,
    ) -> Self {
        Self {
            defaults,
            entries,
            terms,
            contents,
            cache,
        }
    }

    /// Build (or reuse) the ordered item sequence for `site`.
    ///
    /// Items resolving `seo_sitemap_enabled` to false are filtered out.
    /// Broken items (dangling, missing, or malformed canonical
    /// references, no lastmod source, missing site URL) are skipped with
    /// a warning rather than aborting the whole sitemap.
    pub fn build_for_site(&self, site: &str) -> Result<Arc<Vec<SitemapItem>>, SitemapError> {
        if let Some(cached) = self.cache.sitemap(site) {
            return Ok(cached);
        }

        let resolver = DefaultsResolver::new(self.defaults, self.cache);
        let builder = SitemapBuilder::new(self.defaults, self.entries, self.terms, self.cache);

        let mut items = Vec::new();
        for content in self.contents.list_for_site(site)? {
            let resolved = resolver.resolve(
                content.defaults_kind(),
                content.handle(),
                site,
                content.cascade_fields(),
            )?;
            let enabled = resolved
                .get(fields::SITEMAP_ENABLED)
                .map(truthy)
                .unwrap_or(true);
            if !enabled {
                debug!(handle = content.handle(), site, "Sitemap item disabled");
                continue;
            }

            match builder.build(&content, site) {
                Ok(item) => items.push(item),
                Err(
                    err @ (SitemapError::DanglingReference { .. }
                    | SitemapError::MissingCanonicalReference
                    | SitemapError::NoTermsForSite { .. }
                    | SitemapError::MissingSiteUrl { .. }),
                ) => {
                    warn!(handle = content.handle(), site, error = %err, "Skipping sitemap item");
                }
                Err(err) => return Err(err),
            }
        }

        let items = Arc::new(items);
        self.cache.set_sitemap(site, items.clone());
        Ok(items)
    }
}

fn own_url(content: &Content, site: &str) -> Result<String, SitemapError> {
    content
        .absolute_url(site)
        .map(str::to_string)
        .ok_or_else(|| SitemapError::MissingSiteUrl {
            handle: content.handle().to_string(),
            site: site.to_string(),
        })
}

fn url_path(loc: &str) -> String {
    Url::parse(loc)
        .map(|url| url.path().to_string())
        .unwrap_or_else(|_| "/".to_string())
}

fn resolved_text(resolved: &FieldMap, handle: &str) -> String {
    resolved.get(handle).map(text).unwrap_or_default()
}

/// Resolved change frequency, validated against the known hints.
/// Unrecognized stored values normalize to the schema default.
fn changefreq_text(resolved: &FieldMap) -> String {
    resolved
        .get(fields::SITEMAP_CHANGE_FREQUENCY)
        .and_then(Value::as_str)
        .and_then(|raw| ChangeFrequency::try_from(raw).ok())
        .map(|freq| freq.as_str().to_string())
        .unwrap_or_else(|| schema_text(fields::SITEMAP_CHANGE_FREQUENCY))
}

fn schema_text(handle: &str) -> String {
    schema::schema_default(handle).map(text).unwrap_or_default()
}
