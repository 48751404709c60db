//! Locale-scoped SEO defaults with cascading resolution.
//!
//! The core is a field-by-field fallback chain: a content item's own
//! value, else its content type's localized defaults, else the site-wide
//! localized defaults, else a static schema default. Around that sit a
//! localization lifecycle that keeps defaults sets aligned with a type's
//! configured sites, a scope-local cache with a coarse event-driven
//! invalidation protocol, a sitemap item builder, and a gate deciding
//! when entry saves queue social-image generation jobs.
//!
//! Everything runs synchronously within one request or command scope.
//! Persistence, event delivery, and job execution stay behind the
//! collaborator traits in [`application::repos`] and
//! [`application::jobs`]; `infra::memory` ships in-memory adapters.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
pub(crate) mod util;

pub use application::{
    DefaultsResolver, GateTrigger, JobDescriptor, JobOutbox, LocalizationLifecycle, RepoError,
    SitemapBuilder, SitemapError, SitemapItem, SitemapService, SocialImageGate,
};
pub use cache::{CacheConsumer, CacheTrigger, EventQueue, KeySelector, ResolvedKey, ResolverCache};
pub use config::{CacheSettings, ConfigError, SeoConfig, SocialImagesSettings};
pub use domain::{
    CanonicalType, ChangeFrequency, Content, DefaultsKind, DefaultsSet, EntryRecord, FieldMap,
    LocalizedDefaults, SyncOutcome, TaxonomyRecord, TermRecord,
};
