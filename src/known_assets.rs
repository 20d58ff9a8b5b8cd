//! Registry of catalog paths known to be published on the host platform.
//!
//! The registry is a point-in-time snapshot and can go stale: assets published after the
//! snapshot read as missing, and removed assets still read as present. Callers that need an
//! authoritative answer should evaluate [`crate::GeoBoundaries::get_asset`] on the host.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::asset_paths::AssetPathPattern;
use crate::error::KnownAssetsError;
use crate::models::{AssetMetadata, AssetRef, CountryCode};

/// Date the built-in registry was captured.
pub const BUILTIN_SNAPSHOT_DATE: &str = "2021-05-10";

const BUILTIN_ASSETS: &[&str] = &[
  "projects/wri-datalab/geoBoundaries/v3_0_0/ARG/ADM0",
  "projects/wri-datalab/geoBoundaries/v3_0_0/ARG/ADM1",
  "projects/wri-datalab/geoBoundaries/v3_0_0/ARG/ADM2",
  "projects/wri-datalab/geoBoundaries/v3_0_0/BRA/ADM0",
  "projects/wri-datalab/geoBoundaries/v3_0_0/BRA/ADM1",
  "projects/wri-datalab/geoBoundaries/v3_0_0/BRA/ADM2",
  "projects/wri-datalab/geoBoundaries/v3_0_0/CHN/ADM0",
  "projects/wri-datalab/geoBoundaries/v3_0_0/CHN/ADM1",
  "projects/wri-datalab/geoBoundaries/v3_0_0/CHN/ADM2",
  "projects/wri-datalab/geoBoundaries/v3_0_0/CHN/ADM3",
  "projects/wri-datalab/geoBoundaries/v3_0_0/COL/ADM0",
  "projects/wri-datalab/geoBoundaries/v3_0_0/COL/ADM1",
  "projects/wri-datalab/geoBoundaries/v3_0_0/COL/ADM2",
  "projects/wri-datalab/geoBoundaries/v3_0_0/CRI/ADM0",
  "projects/wri-datalab/geoBoundaries/v3_0_0/CRI/ADM1",
  "projects/wri-datalab/geoBoundaries/v3_0_0/CRI/ADM2",
  "projects/wri-datalab/geoBoundaries/v3_0_0/CRI/ADM3",
  "projects/wri-datalab/geoBoundaries/v3_0_0/ETH/ADM0",
  "projects/wri-datalab/geoBoundaries/v3_0_0/ETH/ADM1",
  "projects/wri-datalab/geoBoundaries/v3_0_0/ETH/ADM2",
  "projects/wri-datalab/geoBoundaries/v3_0_0/ETH/ADM3",
  "projects/wri-datalab/geoBoundaries/v3_0_0/IDN/ADM0",
  "projects/wri-datalab/geoBoundaries/v3_0_0/IDN/ADM1",
  "projects/wri-datalab/geoBoundaries/v3_0_0/IDN/ADM2",
  "projects/wri-datalab/geoBoundaries/v3_0_0/IND/ADM0",
  "projects/wri-datalab/geoBoundaries/v3_0_0/IND/ADM1",
  "projects/wri-datalab/geoBoundaries/v3_0_0/IND/ADM2",
  "projects/wri-datalab/geoBoundaries/v3_0_0/KEN/ADM0",
  "projects/wri-datalab/geoBoundaries/v3_0_0/KEN/ADM1",
  "projects/wri-datalab/geoBoundaries/v3_0_0/KEN/ADM2",
  "projects/wri-datalab/geoBoundaries/v3_0_0/KEN/ADM3",
  "projects/wri-datalab/geoBoundaries/v3_0_0/MEX/ADM0",
  "projects/wri-datalab/geoBoundaries/v3_0_0/MEX/ADM1",
  "projects/wri-datalab/geoBoundaries/v3_0_0/MEX/ADM2",
  "projects/wri-datalab/geoBoundaries/v3_0_0/MAR/ADM0",
  "projects/wri-datalab/geoBoundaries/v3_0_0/MAR/ADM1",
  "projects/wri-datalab/geoBoundaries/v3_0_0/MAR/ADM2",
  "projects/wri-datalab/geoBoundaries/v3_0_0/RWA/ADM0",
  "projects/wri-datalab/geoBoundaries/v3_0_0/RWA/ADM1",
  "projects/wri-datalab/geoBoundaries/v3_0_0/RWA/ADM2",
  "projects/wri-datalab/geoBoundaries/v3_0_0/RWA/ADM3",
  "projects/wri-datalab/geoBoundaries/v3_0_0/RWA/ADM4",
  "projects/wri-datalab/geoBoundaries/v3_0_0/SLE/ADM0",
  "projects/wri-datalab/geoBoundaries/v3_0_0/SLE/ADM1",
  "projects/wri-datalab/geoBoundaries/v3_0_0/SLE/ADM2",
  "projects/wri-datalab/geoBoundaries/v3_0_0/SLE/ADM3",
  "projects/wri-datalab/geoBoundaries/v3_0_0/SLE/ADM4",
  "projects/wri-datalab/geoBoundaries/v3_0_0/TUR/ADM0",
  "projects/wri-datalab/geoBoundaries/v3_0_0/TUR/ADM1",
  "projects/wri-datalab/geoBoundaries/v3_0_0/TUR/ADM2",
  "projects/wri-datalab/geoBoundaries/v3_0_0/UGA/ADM0",
  "projects/wri-datalab/geoBoundaries/v3_0_0/UGA/ADM1",
  "projects/wri-datalab/geoBoundaries/v3_0_0/UGA/ADM2",
  "projects/wri-datalab/geoBoundaries/geoBoundariesCGAZ_ADM0",
  "projects/wri-datalab/geoBoundaries/geoBoundariesCGAZ_ADM1",
  "projects/wri-datalab/geoBoundaries/geoBoundariesCGAZ_ADM2",
];

/// On-disk layout of a registry file.
///
/// `assets` is either a plain list of paths or a mapping of path to metadata.
#[derive(Debug, Default, Deserialize)]
struct KnownAssetsFile {
  #[serde(default)]
  snapshot: Option<String>,
  #[serde(default)]
  assets: AssetEntries,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AssetEntries {
  List(Vec<String>),
  Map(BTreeMap<String, AssetMetadata>),
}

impl Default for AssetEntries {
  fn default() -> Self {
    Self::List(Vec::new())
  }
}

/// Published asset paths with optional per-asset metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnownAssets {
  snapshot: Option<String>,
  assets: BTreeMap<String, AssetMetadata>,
}

impl Default for KnownAssets {
  fn default() -> Self {
    Self::builtin()
  }
}

impl KnownAssets {
  /// Registry captured on [`BUILTIN_SNAPSHOT_DATE`].
  pub fn builtin() -> Self {
    Self::from_paths(BUILTIN_ASSETS.iter().copied()).with_snapshot(BUILTIN_SNAPSHOT_DATE)
  }

  /// Shared read-only copy of the built-in registry.
  pub fn builtin_ref() -> &'static KnownAssets {
    static BUILTIN: OnceLock<KnownAssets> = OnceLock::new();
    BUILTIN.get_or_init(Self::builtin)
  }

  /// Registry without any published assets.
  pub fn empty() -> Self {
    Self {
      snapshot: None,
      assets: BTreeMap::new(),
    }
  }

  /// Build a registry from bare paths.
  pub fn from_paths<I, S>(paths: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let assets = paths
      .into_iter()
      .filter_map(|path| normalise_path(path.as_ref()))
      .map(|path| (path, AssetMetadata::default()))
      .collect();

    Self {
      snapshot: None,
      assets,
    }
  }

  /// Attach the date or label the registry was captured at.
  pub fn with_snapshot(mut self, snapshot: impl Into<String>) -> Self {
    self.snapshot = Some(snapshot.into());
    self
  }

  /// Load a registry from a JSON or YAML file.
  ///
  /// Files ending in `.yaml` or `.yml` are read as YAML, everything else as JSON. A missing
  /// file falls back to the built-in snapshot so a fresh checkout keeps working.
  pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, KnownAssetsError> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
      Ok(contents) => contents,
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
        warn!(
          path = %path.display(),
          snapshot = BUILTIN_SNAPSHOT_DATE,
          "known-assets file not found, using built-in snapshot"
        );
        return Ok(Self::builtin());
      }
      Err(err) => {
        return Err(KnownAssetsError::Io {
          path: path.to_path_buf(),
          source: err,
        });
      }
    };

    let is_yaml = path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let file: KnownAssetsFile = if is_yaml {
      serde_yaml::from_str(&contents).map_err(|err| KnownAssetsError::Yaml {
        path: path.to_path_buf(),
        source: err,
      })?
    } else {
      serde_json::from_str(&contents).map_err(|err| KnownAssetsError::Json {
        path: path.to_path_buf(),
        source: err,
      })?
    };

    let registry = Self::from(file);
    debug!(
      path = %path.display(),
      assets = registry.len(),
      "loaded known-assets registry"
    );
    Ok(registry)
  }

  /// Exact-match membership test.
  pub fn contains(&self, path: &str) -> bool {
    self.assets.contains_key(path)
  }

  /// Metadata recorded for `path`, if the path is known.
  pub fn metadata(&self, path: &str) -> Option<&AssetMetadata> {
    self.assets.get(path)
  }

  /// Date or label the registry was captured at, when recorded.
  pub fn snapshot(&self) -> Option<&str> {
    self.snapshot.as_deref()
  }

  /// Number of known paths.
  pub fn len(&self) -> usize {
    self.assets.len()
  }

  /// Returns true when the registry knows no paths at all.
  pub fn is_empty(&self) -> bool {
    self.assets.is_empty()
  }

  /// Known paths in lexical order.
  pub fn paths(&self) -> impl Iterator<Item = &str> {
    self.assets.keys().map(String::as_str)
  }

  /// Known assets for one country, parsed with `pattern`.
  pub fn assets_for(&self, pattern: &AssetPathPattern, code: &CountryCode) -> Vec<AssetRef> {
    self
      .paths()
      .filter_map(|path| pattern.parse(path))
      .filter(|asset| &asset.code == code)
      .collect()
  }

  /// Paths that `pattern` does not recognise as catalog assets.
  pub fn unrecognised<'a>(&'a self, pattern: &AssetPathPattern) -> Vec<&'a str> {
    self
      .paths()
      .filter(|path| pattern.parse(path).is_none())
      .collect()
  }
}

impl From<KnownAssetsFile> for KnownAssets {
  fn from(file: KnownAssetsFile) -> Self {
    let assets = match file.assets {
      AssetEntries::List(paths) => paths
        .into_iter()
        .filter_map(|path| normalise_path(&path))
        .map(|path| (path, AssetMetadata::default()))
        .collect(),
      AssetEntries::Map(entries) => entries
        .into_iter()
        .filter_map(|(path, meta)| normalise_path(&path).map(|path| (path, meta)))
        .collect(),
    };

    Self {
      snapshot: file.snapshot,
      assets,
    }
  }
}

/// Trim whitespace and stray slashes; empty entries are discarded.
fn normalise_path(value: &str) -> Option<String> {
  let trimmed = value.trim().trim_matches('/');
  (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::asset_paths::AssetResolver;
  use crate::models::AdminLevel;
  use tempfile::tempdir;

  #[test]
  fn builtin_snapshot_has_every_listed_path() {
    let registry = KnownAssets::builtin();
    assert_eq!(registry.len(), 56);
    assert_eq!(registry.snapshot(), Some(BUILTIN_SNAPSHOT_DATE));
    assert!(registry.contains("projects/wri-datalab/geoBoundaries/v3_0_0/RWA/ADM4"));
    assert!(registry.contains("projects/wri-datalab/geoBoundaries/geoBoundariesCGAZ_ADM2"));
    assert!(!registry.contains("projects/wri-datalab/geoBoundaries/v3_0_0/USA/ADM0"));
    assert!(!registry.contains("projects/wri-datalab/geoBoundaries/geoBoundariesCGAZ_ADM3"));
  }

  #[test]
  fn builtin_entries_all_parse() {
    let pattern = AssetPathPattern::new(&AssetResolver::default());
    assert!(KnownAssets::builtin().unrecognised(&pattern).is_empty());
  }

  #[test]
  fn lists_assets_for_a_country() {
    let pattern = AssetPathPattern::new(&AssetResolver::default());
    let code = CountryCode::parse("SLE").unwrap();
    let levels: Vec<AdminLevel> = KnownAssets::builtin()
      .assets_for(&pattern, &code)
      .into_iter()
      .map(|asset| asset.level)
      .collect();
    assert_eq!(levels, AdminLevel::ALL.to_vec());
  }

  #[test]
  fn normalises_whitespace_slashes_and_blanks() {
    let registry = KnownAssets::from_paths([" a/b/ ", "", "/a/b", "c"]);
    assert_eq!(registry.paths().collect::<Vec<_>>(), vec!["a/b", "c"]);
    assert_eq!(registry.snapshot(), None);
  }

  #[test]
  fn load_from_path_returns_builtin_for_missing_file() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join("known_assets.json");

    let registry =
      KnownAssets::load_from_path(&path).expect("missing files should not produce an error");

    assert_eq!(registry, KnownAssets::builtin());
  }

  #[test]
  fn load_from_path_reads_json_list() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join("known_assets.json");
    fs::write(
      &path,
      r#"{"snapshot": "2024-01-01", "assets": ["projects/x/v1/USA/ADM0", ""]}"#,
    )
    .expect("failed to write registry file");

    let registry = KnownAssets::load_from_path(&path).expect("registry should load");

    assert_eq!(registry.snapshot(), Some("2024-01-01"));
    assert_eq!(registry.len(), 1);
    assert!(registry.contains("projects/x/v1/USA/ADM0"));
  }

  #[test]
  fn load_from_path_reads_yaml_mapping_with_metadata() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join("known_assets.yaml");
    fs::write(
      &path,
      concat!(
        "snapshot: refreshed\n",
        "assets:\n",
        "  projects/x/v1/RWA/ADM4:\n",
        "    featureCount: 416\n",
        "  projects/x/v1/RWA/ADM0: {}\n",
      ),
    )
    .expect("failed to write registry file");

    let registry = KnownAssets::load_from_path(&path).expect("registry should load");

    assert_eq!(registry.len(), 2);
    assert_eq!(
      registry
        .metadata("projects/x/v1/RWA/ADM4")
        .and_then(|meta| meta.feature_count),
      Some(416)
    );
    assert_eq!(
      registry.metadata("projects/x/v1/RWA/ADM0"),
      Some(&AssetMetadata::default())
    );
  }

  #[test]
  fn load_from_path_reports_parse_errors_with_path() {
    let temp = tempdir().expect("failed to create temp dir");
    let path = temp.path().join("known_assets.json");
    fs::write(&path, "{not json").expect("failed to write registry file");

    let err = KnownAssets::load_from_path(&path).expect_err("invalid JSON should fail");

    assert!(matches!(err, KnownAssetsError::Json { .. }));
    assert!(err.to_string().contains("known_assets.json"));
  }
}
