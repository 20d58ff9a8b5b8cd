//! Seam between descriptors and whatever engine executes them.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::query::{Geometry, Query};

/// An engine able to evaluate [`Query`] descriptors.
///
/// Collections evaluate to GeoJSON `FeatureCollection` values, unions to a GeoJSON geometry and
/// projections to a JSON array (of strings, or of tuples for multi-property projections).
/// Implementations report their own failures (missing assets, transport, auth) and callers
/// receive them unchanged.
pub trait HostPlatform {
  /// Evaluate `query` and return the raw JSON result.
  fn evaluate(&self, query: &Query) -> Result<Value>;

  /// Evaluate a single-property projection into a list of strings.
  fn fetch_strings(&self, query: &Query) -> Result<Vec<String>> {
    let value = self.evaluate(query)?;
    serde_json::from_value(value).context("host returned a value that is not a list of strings")
  }

  /// Evaluate a two-property projection into ordered pairs.
  fn fetch_pairs(&self, query: &Query) -> Result<Vec<(String, String)>> {
    let value = self.evaluate(query)?;
    serde_json::from_value(value).context("host returned a value that is not a list of pairs")
  }

  /// Evaluate a union into a geometry.
  fn fetch_geometry(&self, query: &Query) -> Result<Geometry> {
    let value = self.evaluate(query)?;
    serde_json::from_value(value).context("host returned a value that is not a geometry")
  }
}

impl<H: HostPlatform + ?Sized> HostPlatform for &H {
  fn evaluate(&self, query: &Query) -> Result<Value> {
    (**self).evaluate(query)
  }
}
