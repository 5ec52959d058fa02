// ── Resource and language enums ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::error::CoreError;

/// A named collection of records.
///
/// Each resource has a static baseline file and one local-overlay key.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Resource {
    Reservations,
    Reviews,
}

impl Resource {
    /// Parse a resource name, rejecting anything without an endpoint.
    pub fn parse(name: &str) -> Result<Self, CoreError> {
        name.parse().map_err(|_| CoreError::UnknownResource {
            name: name.to_owned(),
        })
    }

    /// Baseline file path, relative to the site root.
    pub fn baseline_path(self) -> &'static str {
        match self {
            Self::Reservations => "assets/data/reservations.json",
            Self::Reviews => "assets/data/reviews.json",
        }
    }

    /// Key holding the local overlay in the storage port.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Reservations => "quannem_reservations_local",
            Self::Reviews => "quannem_reviews_local",
        }
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Display language for bilingual content.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Lang {
    #[default]
    Vi,
    En,
}

impl Lang {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn resource_round_trips_through_its_name() {
        for resource in [Resource::Reservations, Resource::Reviews] {
            assert_eq!(Resource::parse(resource.as_str()).unwrap(), resource);
        }
        assert_eq!(Resource::Reviews.to_string(), "reviews");
    }

    #[test]
    fn unknown_resource_is_rejected() {
        let err = Resource::parse("menus").unwrap_err();
        assert!(matches!(err, CoreError::UnknownResource { ref name } if name == "menus"));
    }

    #[test]
    fn storage_keys_are_distinct() {
        assert_ne!(
            Resource::Reservations.storage_key(),
            Resource::Reviews.storage_key()
        );
    }

    #[test]
    fn lang_defaults_to_vietnamese() {
        assert_eq!(Lang::default(), Lang::Vi);
        assert_eq!("en".parse::<Lang>().unwrap(), Lang::En);
    }
}
