use tracing::debug;

use crate::error::Result;
use crate::models::{AdminLevel, AssetRef, CountryCode};

/// Catalog folder holding every published geoBoundaries asset.
pub const DEFAULT_BASE_PATH: &str = "projects/wri-datalab/geoBoundaries";
/// Release used when callers do not supply one.
pub const DEFAULT_VERSION: &str = "3_0_0";
/// Country code that selects the global composite layer.
pub const WORLD_CODE: &str = "WLD";
/// Name prefix of the global composite layers, followed by the level token.
pub const WORLD_LAYER_PREFIX: &str = "geoBoundariesCGAZ_";

/// Renders catalog paths from validated `(code, level, version)` triples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetResolver {
    pub(crate) base_path: String,
    pub(crate) default_version: String,
    pub(crate) world_code: String,
    pub(crate) world_layer_prefix: String,
}

impl Default for AssetResolver {
    fn default() -> Self {
        Self {
            base_path: DEFAULT_BASE_PATH.into(),
            default_version: DEFAULT_VERSION.into(),
            world_code: WORLD_CODE.into(),
            world_layer_prefix: WORLD_LAYER_PREFIX.into(),
        }
    }
}

impl AssetResolver {
    /// Create a resolver for a catalog rooted at `base_path`.
    pub fn new(base_path: impl Into<String>, default_version: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into().trim_end_matches('/').to_string(),
            default_version: default_version.into(),
            ..Self::default()
        }
    }

    /// Override the world sentinel code and the composite layer prefix.
    pub fn with_world_layer(
        mut self,
        world_code: impl Into<String>,
        world_layer_prefix: impl Into<String>,
    ) -> Self {
        self.world_code = world_code.into();
        self.world_layer_prefix = world_layer_prefix.into();
        self
    }

    /// Catalog folder the resolver renders paths under.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Release substituted when no version is supplied.
    pub fn default_version(&self) -> &str {
        &self.default_version
    }

    /// Code that selects the global composite layer.
    pub fn world_code(&self) -> &str {
        &self.world_code
    }

    /// Prefix of the global composite layer names.
    pub fn world_layer_prefix(&self) -> &str {
        &self.world_layer_prefix
    }

    /// Validate raw inputs into an [`AssetRef`].
    ///
    /// The country code is checked before the level so a call with two bad arguments reports
    /// the code. The world sentinel drops whatever version was supplied.
    pub fn asset_ref(&self, code: &str, level: &str, version: Option<&str>) -> Result<AssetRef> {
        let code = CountryCode::parse(code)?;
        let level: AdminLevel = level.parse()?;

        let version = if code.as_str() == self.world_code {
            None
        } else {
            Some(version.unwrap_or(&self.default_version).to_string())
        };

        Ok(AssetRef {
            code,
            level,
            version,
        })
    }

    /// Produce the catalog path for an already validated asset reference.
    pub fn render(&self, asset: &AssetRef) -> String {
        if asset.code.as_str() == self.world_code {
            return format!(
                "{}/{}{}",
                self.base_path, self.world_layer_prefix, asset.level
            );
        }

        let version = asset.version.as_deref().unwrap_or(&self.default_version);
        format!(
            "{}/v{}/{}/{}",
            self.base_path, version, asset.code, asset.level
        )
    }

    /// Validate the inputs and render the catalog path in one step.
    pub fn resolve(&self, code: &str, level: &str, version: Option<&str>) -> Result<String> {
        let asset = self.asset_ref(code, level, version)?;
        let path = self.render(&asset);
        debug!(code, level, path = %path, "resolved geoBoundaries asset");
        Ok(path)
    }
}

/// Resolve an asset name against the public geoBoundaries catalog.
///
/// The path may or may not name a published asset; see
/// [`KnownAssets`](crate::KnownAssets) for the existence check.
pub fn resolve_asset_name(code: &str, level: &str, version: Option<&str>) -> Result<String> {
    AssetResolver::default().resolve(code, level, version)
}
