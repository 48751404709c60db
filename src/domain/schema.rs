//! Static SEO field schema.
//!
//! The recognized field handles and their compile-time defaults. Schema
//! defaults are the last cascade layer and are not locale-specific.

use once_cell::sync::Lazy;
use serde_json::{Value, json};

use super::defaults::FieldMap;

/// Field handle constants for call sites.
pub mod fields {
    pub const TITLE: &str = "seo_title";
    pub const DESCRIPTION: &str = "seo_description";
    pub const NOINDEX: &str = "seo_noindex";
    pub const NOFOLLOW: &str = "seo_nofollow";
    pub const CANONICAL_TYPE: &str = "seo_canonical_type";
    pub const CANONICAL_ENTRY: &str = "seo_canonical_entry";
    pub const CANONICAL_CUSTOM: &str = "seo_canonical_custom";
    pub const SITEMAP_ENABLED: &str = "seo_sitemap_enabled";
    pub const SITEMAP_CHANGE_FREQUENCY: &str = "seo_sitemap_change_frequency";
    pub const SITEMAP_PRIORITY: &str = "seo_sitemap_priority";
    pub const GENERATE_SOCIAL_IMAGES: &str = "seo_generate_social_images";
    pub const GENERATOR_COLLECTIONS: &str = "social_images_generator_collections";
}

/// One recognized SEO field and its optional schema default.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub handle: &'static str,
    pub default: Option<Value>,
}

static SEO_FIELDS: Lazy<Vec<FieldSpec>> = Lazy::new(|| {
    vec![
        FieldSpec {
            handle: fields::TITLE,
            default: None,
        },
        FieldSpec {
            handle: fields::DESCRIPTION,
            default: None,
        },
        FieldSpec {
            handle: fields::NOINDEX,
            default: Some(json!(false)),
        },
        FieldSpec {
            handle: fields::NOFOLLOW,
            default: Some(json!(false)),
        },
        FieldSpec {
            handle: fields::CANONICAL_TYPE,
            default: Some(json!("self")),
        },
        FieldSpec {
            handle: fields::CANONICAL_ENTRY,
            default: None,
        },
        FieldSpec {
            handle: fields::CANONICAL_CUSTOM,
            default: None,
        },
        FieldSpec {
            handle: fields::SITEMAP_ENABLED,
            default: Some(json!(true)),
        },
        FieldSpec {
            handle: fields::SITEMAP_CHANGE_FREQUENCY,
            default: Some(json!("weekly")),
        },
        FieldSpec {
            handle: fields::SITEMAP_PRIORITY,
            default: Some(json!("0.5")),
        },
        FieldSpec {
            handle: fields::GENERATE_SOCIAL_IMAGES,
            default: Some(json!(false)),
        },
        FieldSpec {
            handle: fields::GENERATOR_COLLECTIONS,
            default: None,
        },
    ]
});

/// All recognized fields in schema order.
pub fn all() -> &'static [FieldSpec] {
    &SEO_FIELDS
}

/// Whether `handle` is a recognized SEO field.
///
/// Unrecognized handles found in stored data are ignored during
/// resolution, never treated as errors.
pub fn is_recognized(handle: &str) -> bool {
    SEO_FIELDS.iter().any(|spec| spec.handle == handle)
}

/// The schema default for `handle`, if the field defines one.
pub fn schema_default(handle: &str) -> Option<&'static Value> {
    SEO_FIELDS
        .iter()
        .find(|spec| spec.handle == handle)
        .and_then(|spec| spec.default.as_ref())
}

/// All non-null schema defaults as a field map.
pub fn schema_defaults() -> FieldMap {
    SEO_FIELDS
        .iter()
        .filter_map(|spec| {
            spec.default
                .clone()
                .map(|value| (spec.handle.to_string(), value))
        })
        .collect()
}
