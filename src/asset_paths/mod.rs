//! Rendering and parsing of geoBoundaries catalog paths.
//!
//! Rendering is split from parsing so the resolver stays a pure string template while the
//! regex matchers are only compiled by callers that need to read paths back, such as the
//! known-assets registry loader.

mod parse;
mod render;

pub use parse::AssetPathPattern;
pub use render::{
    AssetResolver, DEFAULT_BASE_PATH, DEFAULT_VERSION, WORLD_CODE, WORLD_LAYER_PREFIX,
    resolve_asset_name,
};
