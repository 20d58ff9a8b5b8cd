//! Validated inputs and small records shared across the crate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GeoBoundariesError;

/// Three character, upper-case country identifier (ISO3-like) used as a path segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CountryCode(String);

impl CountryCode {
  /// Validate a raw country code.
  ///
  /// Only length and case are checked, so codes such as `"X1Z"` are accepted. Whether the code
  /// names a published dataset is answered by the known-assets registry, not here.
  pub fn parse(raw: &str) -> Result<Self, GeoBoundariesError> {
    if raw.chars().count() != 3 || raw != raw.to_uppercase() {
      return Err(GeoBoundariesError::InvalidCountryCode(raw.to_string()));
    }
    Ok(Self(raw.to_string()))
  }

  /// Borrow the code as a string slice.
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for CountryCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl FromStr for CountryCode {
  type Err = GeoBoundariesError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

/// Administrative subdivision level, from the country outline (`ADM0`) down to `ADM4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AdminLevel {
  /// Country outline.
  #[serde(rename = "ADM0")]
  Adm0,
  /// First-level subdivision.
  #[serde(rename = "ADM1")]
  Adm1,
  /// Second-level subdivision.
  #[serde(rename = "ADM2")]
  Adm2,
  /// Third-level subdivision.
  #[serde(rename = "ADM3")]
  Adm3,
  /// Fourth-level subdivision.
  #[serde(rename = "ADM4")]
  Adm4,
}

impl AdminLevel {
  /// Every recognised level in ascending order.
  pub const ALL: [AdminLevel; 5] = [
    AdminLevel::Adm0,
    AdminLevel::Adm1,
    AdminLevel::Adm2,
    AdminLevel::Adm3,
    AdminLevel::Adm4,
  ];

  /// Literal token used in catalog paths.
  pub fn as_str(self) -> &'static str {
    match self {
      AdminLevel::Adm0 => "ADM0",
      AdminLevel::Adm1 => "ADM1",
      AdminLevel::Adm2 => "ADM2",
      AdminLevel::Adm3 => "ADM3",
      AdminLevel::Adm4 => "ADM4",
    }
  }
}

impl fmt::Display for AdminLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for AdminLevel {
  type Err = GeoBoundariesError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    AdminLevel::ALL
      .into_iter()
      .find(|level| level.as_str() == s)
      .ok_or_else(|| GeoBoundariesError::InvalidLevel(s.to_string()))
  }
}

/// Validated `(code, level, version)` triple identifying one catalog asset.
///
/// `version` is `None` for the world composite layer, which is not versioned.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetRef {
  /// Country code, or the world sentinel.
  pub code: CountryCode,
  /// Administrative level.
  pub level: AdminLevel,
  /// Release tag such as `3_0_0`.
  pub version: Option<String>,
}

/// Properties every geoBoundaries feature carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureProperty {
  /// Unique per-feature code.
  #[serde(rename = "shapeID")]
  ShapeId,
  /// Human readable name; not guaranteed unique within a level.
  #[serde(rename = "shapeName")]
  ShapeName,
}

impl FeatureProperty {
  /// Property key as stored on features.
  pub fn as_str(self) -> &'static str {
    match self {
      FeatureProperty::ShapeId => "shapeID",
      FeatureProperty::ShapeName => "shapeName",
    }
  }
}

impl fmt::Display for FeatureProperty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Optional metadata attached to an entry of the known-assets registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetadata {
  /// Number of features published in the asset, when recorded.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub feature_count: Option<u64>,
  /// Free-form note, e.g. the release the asset was published with.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub note: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_three_upper_case_characters() {
    assert_eq!(CountryCode::parse("RWA").unwrap().as_str(), "RWA");
    assert!(CountryCode::parse("X1Z").is_ok());
  }

  #[test]
  fn rejects_wrong_length_or_lower_case_codes() {
    for raw in ["us", "usa", "Usa", "USAA", ""] {
      assert_eq!(
        CountryCode::parse(raw),
        Err(GeoBoundariesError::InvalidCountryCode(raw.to_string()))
      );
    }
  }

  #[test]
  fn parses_known_levels_only() {
    assert_eq!("ADM3".parse::<AdminLevel>(), Ok(AdminLevel::Adm3));
    assert_eq!(
      "ADM5".parse::<AdminLevel>(),
      Err(GeoBoundariesError::InvalidLevel("ADM5".into()))
    );
    assert!("adm1".parse::<AdminLevel>().is_err());
  }

  #[test]
  fn serialises_properties_with_catalog_keys() {
    let properties = [FeatureProperty::ShapeName, FeatureProperty::ShapeId];
    let json = serde_json::to_string(&properties).unwrap();
    assert_eq!(json, r#"["shapeName","shapeID"]"#);
  }
}
