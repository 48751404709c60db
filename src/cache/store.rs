//! Resolver cache storage.
//!
//! One `ResolverCache` is one memoization scope: the caller that owns the
//! resolution context (a request, a command run, a test) constructs it and
//! passes it to each resolver call. Independent scopes never share
//! entries; within one scope [`ResolverCache::get_or_compute`] runs the
//! compute function at most once per key until an invalidation lands.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use lru::LruCache;
use tracing::debug;

use crate::application::sitemap::SitemapItem;
use crate::config::CacheSettings;
use crate::domain::FieldMap;
use crate::util::lock::{rw_read, rw_write};

use super::keys::{KeySelector, ResolvedKey};

const SOURCE: &str = "cache::store";

/// Scope-local cache of resolved cascades plus per-site sitemap snapshots.
pub struct ResolverCache {
    resolved: RwLock<LruCache<ResolvedKey, Arc<FieldMap>>>,
    sitemaps: RwLock<HashMap<String, Arc<Vec<SitemapItem>>>>,
}

impl ResolverCache {
    pub fn new(settings: &CacheSettings) -> Self {
        Self {
            resolved: RwLock::new(LruCache::new(settings.resolved_limit_non_zero())),
            sitemaps: RwLock::new(HashMap::new()),
        }
    }

    /// Memoized lookup of the resolved cascade for `key`.
    ///
    /// The scope is single-threaded per resolution context, which is what
    /// guarantees at-most-once computation; a multi-threaded host sharing
    /// one scope may compute a key twice under a miss race but never reads
    /// a stale value past an invalidation.
    pub fn get_or_compute<F, E>(&self, key: ResolvedKey, compute: F) -> Result<Arc<FieldMap>, E>
    where
        F: FnOnce() -> Result<FieldMap, E>,
    {
        if let Some(hit) = rw_write(&self.resolved, SOURCE, "get_or_compute")
            .get(&key)
            .cloned()
        {
            return Ok(hit);
        }

        let value = Arc::new(compute()?);
        debug!(
            kind = key.kind.as_str(),
            handle = %key.handle,
            locale = %key.locale,
            "Resolved cascade cached"
        );
        rw_write(&self.resolved, SOURCE, "get_or_compute.put").put(key, value.clone());
        Ok(value)
    }

    /// Drop every resolved entry the selector matches.
    ///
    /// Returns the number of entries removed. Applied atomically relative
    /// to reads: a concurrent resolution either sees the entry before the
    /// pop or misses afterwards.
    pub fn invalidate(&self, selector: &KeySelector) -> usize {
        let mut resolved = rw_write(&self.resolved, SOURCE, "invalidate");
        let stale: Vec<ResolvedKey> = resolved
            .iter()
            .filter(|(key, _)| selector.matches(key))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &stale {
            resolved.pop(key);
        }
        stale.len()
    }

    pub fn invalidate_all(&self) {
        rw_write(&self.resolved, SOURCE, "invalidate_all").clear();
        rw_write(&self.sitemaps, SOURCE, "invalidate_all.sitemaps").clear();
    }

    pub fn resolved_len(&self) -> usize {
        rw_read(&self.resolved, SOURCE, "resolved_len").len()
    }

    pub fn sitemap(&self, site: &str) -> Option<Arc<Vec<SitemapItem>>> {
        rw_read(&self.sitemaps, SOURCE, "sitemap").get(site).cloned()
    }

    pub fn set_sitemap(&self, site: impl Into<String>, items: Arc<Vec<SitemapItem>>) {
        rw_write(&self.sitemaps, SOURCE, "set_sitemap").insert(site.into(), items);
    }

    pub fn invalidate_sitemaps(&self) {
        rw_write(&self.sitemaps, SOURCE, "invalidate_sitemaps").clear();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::convert::Infallible;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use serde_json::json;

    use crate::domain::DefaultsKind;

    use super::*;

    fn store() -> ResolverCache {
        ResolverCache::new(&CacheSettings::default())
    }

    fn key(handle: &str, locale: &str) -> ResolvedKey {
        ResolvedKey::new(DefaultsKind::Collections, handle, locale)
    }

    fn fields(title: &str) -> FieldMap {
        FieldMap::from([("seo_title".to_string(), json!(title))])
    }

    #[test]
    fn computes_once_per_key() {
        let cache = store();
        let runs = Cell::new(0);

        let compute = || -> Result<FieldMap, Infallible> {
            runs.set(runs.get() + 1);
            Ok(fields("Hello"))
        };

        let first = cache.get_or_compute(key("articles", "en"), compute).unwrap();
        let second = cache
            .get_or_compute(key("articles", "en"), || -> Result<FieldMap, Infallible> {
                runs.set(runs.get() + 1);
                Ok(fields("Hello"))
            })
            .unwrap();

        assert_eq!(runs.get(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn failed_compute_is_not_cached() {
        let cache = store();

        let err: Result<_, String> =
            cache.get_or_compute(key("articles", "en"), || Err("boom".to_string()));
        assert!(err.is_err());

        let ok = cache
            .get_or_compute(key("articles", "en"), || -> Result<FieldMap, String> {
                Ok(fields("Recovered"))
            })
            .unwrap();
        assert_eq!(ok.get("seo_title"), Some(&json!("Recovered")));
    }

    #[test]
    fn invalidate_by_selector_spans_locales() {
        let cache = store();
        for locale in ["en", "fr"] {
            cache
                .get_or_compute(key("articles", locale), || -> Result<FieldMap, Infallible> {
                    Ok(fields(locale))
                })
                .unwrap();
        }
        cache
            .get_or_compute(key("pages", "en"), || -> Result<FieldMap, Infallible> {
                Ok(fields("Pages"))
            })
            .unwrap();

        let removed = cache.invalidate(&KeySelector::set(DefaultsKind::Collections, "articles"));

        assert_eq!(removed, 2);
        assert_eq!(cache.resolved_len(), 1);
    }

    #[test]
    fn recompute_after_invalidation() {
        let cache = store();
        let runs = Cell::new(0);
        let mut compute = || {
            let value = runs.get() + 1;
            runs.set(value);
            Ok::<_, Infallible>(fields(&value.to_string()))
        };

        cache.get_or_compute(key("articles", "en"), &mut compute).unwrap();
        cache.invalidate(&KeySelector::set(DefaultsKind::Collections, "articles"));
        let recomputed = cache.get_or_compute(key("articles", "en"), &mut compute).unwrap();

        assert_eq!(runs.get(), 2);
        assert_eq!(recomputed.get("seo_title"), Some(&json!("2")));
    }

    #[test]
    fn sitemap_region_round_trip() {
        let cache = store();
        assert!(cache.sitemap("en").is_none());

        cache.set_sitemap("en", Arc::new(Vec::new()));
        assert!(cache.sitemap("en").is_some());

        cache.invalidate_sitemaps();
        assert!(cache.sitemap("en").is_none());
    }

    #[test]
    fn recovers_from_poisoned_lock() {
        let cache = store();

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = cache.resolved.write().expect("resolved lock");
            panic!("poison resolved lock");
        }));

        cache
            .get_or_compute(key("articles", "en"), || -> Result<FieldMap, Infallible> {
                Ok(fields("Still works"))
            })
            .unwrap();
        assert_eq!(cache.resolved_len(), 1);
    }
}
