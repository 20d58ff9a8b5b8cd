#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod catalog;
pub mod config;
pub mod docs;
pub mod earth_engine;
pub mod error;
pub mod host;
pub mod known_assets;
pub mod memory;
pub mod models;
pub mod query;

pub use asset_paths::{AssetPathPattern, AssetResolver, resolve_asset_name};
pub use catalog::{
  GeoBoundaries, asset_exists, filter_by_codes, filter_by_names, get_asset, get_features,
  list_codes, list_names, list_names_and_codes, union_by_codes, union_by_names,
};
pub use config::CatalogConfig;
pub use docs::{docs, print_docs};
pub use error::{GeoBoundariesError, KnownAssetsError};
pub use host::HostPlatform;
pub use known_assets::KnownAssets;
pub use memory::InMemoryHost;
pub use models::{AdminLevel, AssetRef, CountryCode, FeatureProperty};
pub use query::{Filter, Geometry, Query, QueryOutput, ValueList};

/// Library version string.
pub fn version() -> &'static str {
  env!("CARGO_PKG_VERSION")
}
