//! Crate configuration.
//!
//! Settings are plain serde structs with defaults, loadable from a TOML
//! document:
//!
//! ```toml
//! [social_images]
//! enabled = true
//! generate_on_demand = false
//!
//! [cache]
//! enabled = true
//! resolved_limit = 256
//! ```

use std::num::NonZeroUsize;

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_RESOLVED_LIMIT: usize = 256;
const DEFAULT_CONSUME_BATCH_LIMIT: usize = 100;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeoConfig {
    pub social_images: SocialImagesSettings,
    pub cache: CacheSettings,
}

impl SeoConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }
}

/// Social-image generator settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SocialImagesSettings {
    /// Master switch for the generator feature.
    pub enabled: bool,
    /// Defer generation to explicit action instead of generating on save.
    pub generate_on_demand: bool,
}

impl Default for SocialImagesSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            generate_on_demand: false,
        }
    }
}

/// Resolver cache settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Enable the event-driven invalidation pipeline.
    pub enabled: bool,
    /// Maximum resolved cascades kept per scope.
    pub resolved_limit: usize,
    /// Maximum events per consumption batch.
    pub consume_batch_limit: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            resolved_limit: DEFAULT_RESOLVED_LIMIT,
            consume_batch_limit: DEFAULT_CONSUME_BATCH_LIMIT,
        }
    }
}

impl CacheSettings {
    /// The resolved-cascade limit as NonZeroUsize, clamping to 1 if zero.
    pub fn resolved_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.resolved_limit).unwrap_or(NonZeroUsize::MIN)
    }
}
