//! Catalog helpers: existence checks, asset retrieval and the filter/union/list conveniences.
//!
//! Everything here returns [`Query`] descriptors. Pass them to a [`HostPlatform`] (or use the
//! `fetch_*` shortcuts on [`GeoBoundaries`]) to get values back.

use anyhow::Result as HostResult;
use tracing::{debug, warn};

use crate::asset_paths::{AssetPathPattern, AssetResolver};
use crate::config::CatalogConfig;
use crate::error::{KnownAssetsError, Result};
use crate::host::HostPlatform;
use crate::known_assets::KnownAssets;
use crate::models::FeatureProperty;
use crate::query::{Filter, Geometry, Query, ValueList};

/// Resolver plus known-assets registry, the entry point for catalog lookups.
#[derive(Debug, Clone, Default)]
pub struct GeoBoundaries {
  resolver: AssetResolver,
  known_assets: KnownAssets,
}

impl GeoBoundaries {
  /// Combine a resolver with a registry.
  pub fn new(resolver: AssetResolver, known_assets: KnownAssets) -> Self {
    Self {
      resolver,
      known_assets,
    }
  }

  /// Build from configuration, loading the configured registry file if any.
  ///
  /// Registry entries the resolver cannot parse are kept but reported, since they can never
  /// match a rendered path.
  pub fn from_config(config: &CatalogConfig) -> std::result::Result<Self, KnownAssetsError> {
    let resolver = config.to_resolver();
    let known_assets = config.load_known_assets()?;

    let pattern = AssetPathPattern::new(&resolver);
    for path in known_assets.unrecognised(&pattern) {
      warn!(path, "known-assets entry is not a path this resolver renders");
    }

    Ok(Self::new(resolver, known_assets))
  }

  /// Resolver used to render paths.
  pub fn resolver(&self) -> &AssetResolver {
    &self.resolver
  }

  /// Registry used by [`GeoBoundaries::asset_exists`].
  pub fn known_assets(&self) -> &KnownAssets {
    &self.known_assets
  }

  /// Render the catalog path for `(code, level, version)`.
  pub fn resolve_asset_name(
    &self,
    code: &str,
    level: &str,
    version: Option<&str>,
  ) -> Result<String> {
    self.resolver.resolve(code, level, version)
  }

  /// Whether the rendered path is listed in the known-assets registry.
  ///
  /// Validation failures propagate; a well-formed but unlisted asset is `Ok(false)`. The answer
  /// is only as fresh as the registry snapshot.
  pub fn asset_exists(&self, code: &str, level: &str, version: Option<&str>) -> Result<bool> {
    let path = self.resolve_asset_name(code, level, version)?;
    let exists = self.known_assets.contains(&path);
    debug!(
      path = %path,
      exists,
      snapshot = self.known_assets.snapshot(),
      "checked known assets"
    );
    Ok(exists)
  }

  /// Descriptor loading the asset's feature collection.
  ///
  /// Not checked against the registry: a path missing from the catalog fails on the host.
  pub fn get_asset(&self, code: &str, level: &str, version: Option<&str>) -> Result<Query> {
    Ok(Query::asset(self.resolve_asset_name(code, level, version)?))
  }

  fn default_asset(
    &self,
    code: &str,
    level: &str,
    intersecting: Option<&Geometry>,
  ) -> Result<Query> {
    let asset = self.get_asset(code, level, None)?;
    Ok(match intersecting {
      Some(geometry) => asset.filter_bounds(geometry.clone()),
      None => asset,
    })
  }

  /// Descriptor listing `shapeID`s, optionally restricted to features intersecting a geometry.
  ///
  /// Always reads the default release. Order follows the filtered collection.
  pub fn list_codes(
    &self,
    code: &str,
    level: &str,
    intersecting: Option<&Geometry>,
  ) -> Result<Query> {
    Ok(self
      .default_asset(code, level, intersecting)?
      .project(vec![FeatureProperty::ShapeId]))
  }

  /// Descriptor listing `shapeName`s; see [`GeoBoundaries::list_codes`].
  pub fn list_names(
    &self,
    code: &str,
    level: &str,
    intersecting: Option<&Geometry>,
  ) -> Result<Query> {
    Ok(self
      .default_asset(code, level, intersecting)?
      .project(vec![FeatureProperty::ShapeName]))
  }

  /// Descriptor listing `(shapeName, shapeID)` pairs read in one projection.
  pub fn list_names_and_codes(
    &self,
    code: &str,
    level: &str,
    intersecting: Option<&Geometry>,
  ) -> Result<Query> {
    Ok(self
      .default_asset(code, level, intersecting)?
      .project(vec![FeatureProperty::ShapeName, FeatureProperty::ShapeId]))
  }

  /// Descriptor for the features of an asset at the default release.
  ///
  /// With a geometry, the asset is filtered by the `shapeID`s of the intersecting features, so
  /// the result carries the asset's own features rather than the raw spatial filter output.
  pub fn get_features(
    &self,
    code: &str,
    level: &str,
    intersecting: Option<&Geometry>,
  ) -> Result<Query> {
    let Some(geometry) = intersecting else {
      return self.get_asset(code, level, None);
    };

    let codes = self.list_codes(code, level, Some(geometry))?;
    Ok(self.get_asset(code, level, None)?.filter(Filter::InList {
      property: FeatureProperty::ShapeId,
      values: ValueList::Computed(Box::new(codes)),
    }))
  }

  /// Evaluate [`GeoBoundaries::list_codes`] on `host`.
  pub fn fetch_codes<H: HostPlatform>(
    &self,
    host: &H,
    code: &str,
    level: &str,
    intersecting: Option<&Geometry>,
  ) -> HostResult<Vec<String>> {
    host.fetch_strings(&self.list_codes(code, level, intersecting)?)
  }

  /// Evaluate [`GeoBoundaries::list_names`] on `host`.
  pub fn fetch_names<H: HostPlatform>(
    &self,
    host: &H,
    code: &str,
    level: &str,
    intersecting: Option<&Geometry>,
  ) -> HostResult<Vec<String>> {
    host.fetch_strings(&self.list_names(code, level, intersecting)?)
  }

  /// Evaluate [`GeoBoundaries::list_names_and_codes`] on `host`.
  pub fn fetch_names_and_codes<H: HostPlatform>(
    &self,
    host: &H,
    code: &str,
    level: &str,
    intersecting: Option<&Geometry>,
  ) -> HostResult<Vec<(String, String)>> {
    host.fetch_pairs(&self.list_names_and_codes(code, level, intersecting)?)
  }
}

/// Keep features whose `shapeID` is in `codes`. Output order is the collection's.
pub fn filter_by_codes<I, S>(collection: Query, codes: I) -> Query
where
  I: IntoIterator<Item = S>,
  S: Into<String>,
{
  collection.filter_in_list(FeatureProperty::ShapeId, codes)
}

/// Keep features whose `shapeName` is in `names`.
///
/// Names are not unique within a level, so every feature sharing a listed name is kept.
/// Prefer [`filter_by_codes`] when codes are available.
pub fn filter_by_names<I, S>(collection: Query, names: I) -> Query
where
  I: IntoIterator<Item = S>,
  S: Into<String>,
{
  collection.filter_in_list(FeatureProperty::ShapeName, names)
}

/// Geometric union of the features selected by [`filter_by_codes`].
///
/// The descriptor is returned; the geoBoundaries Earth Engine JavaScript module's
/// `unionByCodes` computes the same union but discards it.
pub fn union_by_codes<I, S>(collection: Query, codes: I) -> Query
where
  I: IntoIterator<Item = S>,
  S: Into<String>,
{
  filter_by_codes(collection, codes).union()
}

/// Geometric union of the features selected by [`filter_by_names`], with the same caveats.
///
/// Returned like [`union_by_codes`]; the JavaScript `unionByNames` discards its result.
pub fn union_by_names<I, S>(collection: Query, names: I) -> Query
where
  I: IntoIterator<Item = S>,
  S: Into<String>,
{
  filter_by_names(collection, names).union()
}

/// [`GeoBoundaries::asset_exists`] against the built-in registry and default resolver.
pub fn asset_exists(code: &str, level: &str, version: Option<&str>) -> Result<bool> {
  let path = AssetResolver::default().resolve(code, level, version)?;
  Ok(KnownAssets::builtin_ref().contains(&path))
}

// Descriptor builders never consult the registry.
fn descriptors() -> GeoBoundaries {
  GeoBoundaries::new(AssetResolver::default(), KnownAssets::empty())
}

/// [`GeoBoundaries::get_asset`] with the default resolver.
pub fn get_asset(code: &str, level: &str, version: Option<&str>) -> Result<Query> {
  descriptors().get_asset(code, level, version)
}

/// [`GeoBoundaries::list_codes`] with the default resolver.
pub fn list_codes(code: &str, level: &str, intersecting: Option<&Geometry>) -> Result<Query> {
  descriptors().list_codes(code, level, intersecting)
}

/// [`GeoBoundaries::list_names`] with the default resolver.
pub fn list_names(code: &str, level: &str, intersecting: Option<&Geometry>) -> Result<Query> {
  descriptors().list_names(code, level, intersecting)
}

/// [`GeoBoundaries::list_names_and_codes`] with the default resolver.
pub fn list_names_and_codes(
  code: &str,
  level: &str,
  intersecting: Option<&Geometry>,
) -> Result<Query> {
  descriptors().list_names_and_codes(code, level, intersecting)
}

/// [`GeoBoundaries::get_features`] with the default resolver.
pub fn get_features(code: &str, level: &str, intersecting: Option<&Geometry>) -> Result<Query> {
  descriptors().get_features(code, level, intersecting)
}
