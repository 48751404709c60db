//! Shared domain enumerations aligned with stored default-set data.

use serde::{Deserialize, Serialize};

/// Ownership level of a defaults set.
///
/// `Site` sets hold site-wide fallbacks, `Collections` and `Taxonomies`
/// sets hold per-content-type fallbacks keyed by the container handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultsKind {
    Site,
    Collections,
    Taxonomies,
}

impl DefaultsKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DefaultsKind::Site => "site",
            DefaultsKind::Collections => "collections",
            DefaultsKind::Taxonomies => "taxonomies",
        }
    }
}

impl TryFrom<&str> for DefaultsKind {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "site" => Ok(DefaultsKind::Site),
            "collections" => Ok(DefaultsKind::Collections),
            "taxonomies" => Ok(DefaultsKind::Taxonomies),
            _ => Err(()),
        }
    }
}

/// How a content item's canonical URL is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalType {
    /// The item's own absolute URL.
    #[serde(rename = "self")]
    SelfUrl,
    /// The absolute URL of another, explicitly referenced entry.
    Other,
    /// A literal URL string.
    Custom,
}

impl CanonicalType {
    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalType::SelfUrl => "self",
            CanonicalType::Other => "other",
            CanonicalType::Custom => "custom",
        }
    }
}

impl TryFrom<&str> for CanonicalType {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "self" => Ok(CanonicalType::SelfUrl),
            "other" => Ok(CanonicalType::Other),
            "custom" => Ok(CanonicalType::Custom),
            _ => Err(()),
        }
    }
}

/// Sitemap change-frequency hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

impl TryFrom<&str> for ChangeFrequency {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "always" => Ok(ChangeFrequency::Always),
            "hourly" => Ok(ChangeFrequency::Hourly),
            "daily" => Ok(ChangeFrequency::Daily),
            "weekly" => Ok(ChangeFrequency::Weekly),
            "monthly" => Ok(ChangeFrequency::Monthly),
            "yearly" => Ok(ChangeFrequency::Yearly),
            "never" => Ok(ChangeFrequency::Never),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_kind_round_trips() {
        for kind in [
            DefaultsKind::Site,
            DefaultsKind::Collections,
            DefaultsKind::Taxonomies,
        ] {
            assert_eq!(DefaultsKind::try_from(kind.as_str()), Ok(kind));
        }
        assert!(DefaultsKind::try_from("globals").is_err());
    }

    #[test]
    fn canonical_type_round_trips() {
        for ct in [
            CanonicalType::SelfUrl,
            CanonicalType::Other,
            CanonicalType::Custom,
        ] {
            assert_eq!(CanonicalType::try_from(ct.as_str()), Ok(ct));
        }
        assert!(CanonicalType::try_from("alternate").is_err());
    }

    #[test]
    fn change_frequency_round_trips() {
        assert_eq!(
            ChangeFrequency::try_from("weekly"),
            Ok(ChangeFrequency::Weekly)
        );
        assert!(ChangeFrequency::try_from("fortnightly").is_err());
    }
}
