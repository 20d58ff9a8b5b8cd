//! Catalog configuration loader describing where geoBoundaries assets live.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::asset_paths::{
    AssetResolver, DEFAULT_BASE_PATH, DEFAULT_VERSION, WORLD_CODE, WORLD_LAYER_PREFIX,
};
use crate::error::KnownAssetsError;
use crate::known_assets::KnownAssets;

/// File name searched for by [`CatalogConfig::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "geoboundaries.config.json";

/// Discoverable configuration describing the catalog layout and the known-assets registry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog folder holding the versioned country assets.
    pub base_path: String,
    /// Release substituted when callers omit a version.
    pub default_version: String,
    /// Country code that selects the global composite layer.
    pub world_code: String,
    /// Name prefix of the global composite layers.
    pub world_layer_prefix: String,
    /// Optional JSON or YAML registry of published assets, relative to the config file.
    pub known_assets_path: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.into(),
            default_version: DEFAULT_VERSION.into(),
            world_code: WORLD_CODE.into(),
            world_layer_prefix: WORLD_LAYER_PREFIX.into(),
            known_assets_path: None,
        }
    }
}

impl CatalogConfig {
    /// Look for [`DEFAULT_CONFIG_FILE`] in `dir`.
    ///
    /// A missing or unparseable file yields the public catalog defaults.
    pub fn discover(dir: &Path) -> Self {
        Self::from_path(&dir.join(DEFAULT_CONFIG_FILE)).unwrap_or_default()
    }

    /// Read configuration from a specific JSON file.
    ///
    /// A relative `known_assets_path` is resolved against the file's directory.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        match serde_json::from_str::<Self>(&content) {
            Ok(mut config) => {
                let base = path.parent().unwrap_or(Path::new(""));
                config.known_assets_path = config
                    .known_assets_path
                    .map(|registry| base.join(registry).to_string_lossy().into_owned());
                Some(config)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unparseable catalog config");
                None
            }
        }
    }

    /// Build the resolver described by this configuration.
    pub fn to_resolver(&self) -> AssetResolver {
        AssetResolver::new(&self.base_path, &self.default_version)
            .with_world_layer(&self.world_code, &self.world_layer_prefix)
    }

    /// Location of the registry file, if one is configured.
    pub fn known_assets_file(&self) -> Option<PathBuf> {
        self.known_assets_path.as_ref().map(PathBuf::from)
    }

    /// Load the configured registry, or the built-in snapshot when none is configured.
    pub fn load_known_assets(&self) -> Result<KnownAssets, KnownAssetsError> {
        match self.known_assets_file() {
            Some(path) => KnownAssets::load_from_path(path),
            None => Ok(KnownAssets::builtin()),
        }
    }
}
