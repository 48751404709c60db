//! Defaults cascade resolver.
//!
//! Resolves effective SEO field values by walking an ordered chain of
//! layers: content item → type defaults (locale) → site defaults (locale)
//! → static schema default. First non-null wins, per field. A layer with
//! no matching set or locale contributes nothing; this is never an error.
//!
//! The below-content portion of the chain is memoized in the caller's
//! cache scope keyed by `(kind, handle, locale)`, so repeated resolutions
//! against the same set load the stores at most once per scope.

use serde_json::Value;

use crate::cache::{ResolvedKey, ResolverCache};
use crate::domain::{DefaultsKind, FieldMap, schema};

use super::repos::{DefaultsRepo, RepoError};

/// The ephemeral, per-resolution chain of field-map layers, highest
/// priority first. The static schema default is the implicit last layer.
pub struct CascadeChain<'c> {
    layers: Vec<&'c FieldMap>,
}

impl<'c> CascadeChain<'c> {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Append a layer below the ones already pushed.
    pub fn push(&mut self, layer: &'c FieldMap) -> &mut Self {
        self.layers.push(layer);
        self
    }

    /// First non-null value for `handle` walking the layers, then the
    /// schema default.
    pub fn resolve_field(&self, handle: &str) -> Option<&'c Value> {
        for layer in &self.layers {
            if let Some(value) = layer.get(handle).filter(|value| !value.is_null()) {
                return Some(value);
            }
        }
        schema::schema_default(handle)
    }

    /// Resolve every recognized field, omitting fields absent from all
    /// layers. Unrecognized handles in any layer are ignored.
    pub fn resolve_all(&self) -> FieldMap {
        schema::all()
            .iter()
            .filter_map(|spec| {
                self.resolve_field(spec.handle)
                    .map(|value| (spec.handle.to_string(), value.clone()))
            })
            .collect()
    }
}

impl Default for CascadeChain<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Pure-read resolver over the defaults store and a cache scope.
pub struct DefaultsResolver<'a> {
    defaults: &'a dyn DefaultsRepo,
    cache: &'a ResolverCache,
}

impl<'a> DefaultsResolver<'a> {
    pub fn new(defaults: &'a dyn DefaultsRepo, cache: &'a ResolverCache) -> Self {
        Self { defaults, cache }
    }

    /// Resolve the effective fields for `(kind, handle, locale)` with an
    /// optional content-item layer on top.
    ///
    /// Chain shape by kind: `Collections` resolves through all four
    /// layers; `Taxonomies` has no site layer (and terms pass no content
    /// layer); `Site` is the set itself over the schema.
    pub fn resolve(
        &self,
        kind: DefaultsKind,
        handle: &str,
        locale: &str,
        content_fields: Option<&FieldMap>,
    ) -> Result<FieldMap, RepoError> {
        let below = self
            .cache
            .get_or_compute(ResolvedKey::new(kind, handle, locale), || {
                self.compute_below_content(kind, handle, locale)
            })?;

        let mut resolved = (*below).clone();
        if let Some(fields) = content_fields {
            for (field, value) in fields {
                if value.is_null() || !schema::is_recognized(field) {
                    continue;
                }
                resolved.insert(field.clone(), value.clone());
            }
        }
        Ok(resolved)
    }

    /// The resolved, filtered mapping below the content layer: type
    /// defaults over site defaults over schema, per the kind's chain.
    fn compute_below_content(
        &self,
        kind: DefaultsKind,
        handle: &str,
        locale: &str,
    ) -> Result<FieldMap, RepoError> {
        let type_set = self.defaults.load(kind, handle)?;

        // Site-wide sets only participate for collection content; the
        // taxonomy chain degenerates to type defaults over schema.
        let site_sets = if kind == DefaultsKind::Collections {
            self.defaults.load_all(DefaultsKind::Site)?
        } else {
            Vec::new()
        };

        let mut chain = CascadeChain::new();
        if let Some(slice) = type_set.as_ref().and_then(|set| set.in_locale(locale)) {
            chain.push(slice.data());
        }
        for set in &site_sets {
            if let Some(slice) = set.in_locale(locale) {
                chain.push(slice.data());
            }
        }

        Ok(chain.resolve_all())
    }
}
