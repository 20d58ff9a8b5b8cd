//! Offline [`HostPlatform`] evaluating descriptors against locally registered features.
//!
//! Useful with the GeoJSON files geoBoundaries publishes for download, and as a test double.
//! Spatial predicates use bounding boxes, so intersection is approximate, and unions are not
//! dissolved: polygonal members are collected into one `MultiPolygon`.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::debug;

use crate::host::HostPlatform;
use crate::models::FeatureProperty;
use crate::query::{Filter, Geometry, Query, ValueList};

/// Failures specific to the in-memory host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryHostError {
  /// No features were registered under the requested path.
  #[error("asset {0} does not exist or you do not have access to it")]
  AssetNotFound(String),
}

/// GeoJSON feature as stored by the in-memory host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
  /// Feature attributes such as `shapeID` and `shapeName`.
  #[serde(default, deserialize_with = "null_as_empty")]
  pub properties: Map<String, Value>,
  /// Feature geometry; GeoJSON allows it to be null.
  #[serde(default)]
  pub geometry: Option<Geometry>,
}

impl Feature {
  /// Feature carrying the two geoBoundaries properties.
  pub fn new(shape_id: &str, shape_name: &str, geometry: Option<Geometry>) -> Self {
    let mut properties = Map::new();
    properties.insert(FeatureProperty::ShapeId.as_str().into(), json!(shape_id));
    properties.insert(FeatureProperty::ShapeName.as_str().into(), json!(shape_name));
    Self {
      properties,
      geometry,
    }
  }

  /// Returns true when both `shapeID` and `shapeName` are readable.
  pub fn is_complete(&self) -> bool {
    self.property(FeatureProperty::ShapeId).is_some()
      && self.property(FeatureProperty::ShapeName).is_some()
  }

  /// Property value rendered as a string; numbers are stringified, other types are absent.
  pub fn property(&self, property: FeatureProperty) -> Option<String> {
    match self.properties.get(property.as_str())? {
      Value::String(value) => Some(value.clone()),
      Value::Number(value) => Some(value.to_string()),
      _ => None,
    }
  }
}

#[derive(Debug, Deserialize)]
struct FeatureCollectionFile {
  #[serde(default)]
  features: Vec<Feature>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

enum Evaluated {
  Collection(Vec<Feature>),
  Geometry(Geometry),
  List(Vec<Value>),
}

/// Host holding feature collections keyed by catalog path.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHost {
  assets: BTreeMap<String, Vec<Feature>>,
}

impl InMemoryHost {
  /// Host without any registered assets.
  pub fn new() -> Self {
    Self::default()
  }

  /// Register `features` under `path`, replacing previous contents.
  pub fn insert(&mut self, path: impl Into<String>, features: Vec<Feature>) {
    self.assets.insert(path.into(), features);
  }

  /// Builder form of [`InMemoryHost::insert`].
  pub fn with_asset(mut self, path: impl Into<String>, features: Vec<Feature>) -> Self {
    self.insert(path, features);
    self
  }

  /// Register a GeoJSON `FeatureCollection` document under `path`.
  pub fn insert_geojson(&mut self, path: impl Into<String>, geojson: &str) -> Result<()> {
    let path = path.into();
    let file: FeatureCollectionFile = serde_json::from_str(geojson)
      .with_context(|| format!("failed to parse GeoJSON for {path}"))?;
    debug!(asset = %path, features = file.features.len(), "registered GeoJSON asset");
    self.insert(path, file.features);
    Ok(())
  }

  /// Read a GeoJSON file from disk and register it under `path`.
  pub fn load_geojson_file(&mut self, path: impl Into<String>, file: &Path) -> Result<()> {
    let content =
      fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    self.insert_geojson(path, &content)
  }

  fn eval(&self, query: &Query) -> Result<Evaluated> {
    match query {
      Query::Asset { path } => self
        .assets
        .get(path)
        .cloned()
        .map(Evaluated::Collection)
        .ok_or_else(|| MemoryHostError::AssetNotFound(path.clone()).into()),
      Query::Filter { source, filter } => {
        let features = self.eval_collection(source)?;
        let kept = match filter {
          Filter::InList { property, values } => {
            let accepted = self.eval_values(values)?;
            features
              .into_iter()
              .filter(|feature| {
                feature
                  .property(*property)
                  .is_some_and(|value| accepted.contains(&value))
              })
              .collect()
          }
          Filter::Intersects { geometry } => {
            let Some(area) = geometry.bounds() else {
              return Ok(Evaluated::Collection(Vec::new()));
            };
            features
              .into_iter()
              .filter(|feature| {
                feature
                  .geometry
                  .as_ref()
                  .and_then(Geometry::bounds)
                  .is_some_and(|bounds| bounds.intersects(&area))
              })
              .collect()
          }
        };
        Ok(Evaluated::Collection(kept))
      }
      Query::Union { source } => {
        let polygons = self
          .eval_collection(source)?
          .iter()
          .filter_map(|feature| feature.geometry.as_ref())
          .flat_map(Geometry::polygons)
          .collect();
        Ok(Evaluated::Geometry(Geometry::MultiPolygon(polygons)))
      }
      Query::Project { source, properties } => {
        let features = self.eval_collection(source)?;
        // Rows need both geoBoundaries properties whatever is projected, so code, name and
        // pair listings of one collection always have equal lengths.
        let rows = features
          .iter()
          .filter(|feature| feature.is_complete())
          .filter_map(|feature| {
            properties
              .iter()
              .map(|property| feature.property(*property))
              .collect::<Option<Vec<String>>>()
          });
        let list: Vec<Value> = if properties.len() == 1 {
          rows.flat_map(|row| row.into_iter().map(Value::String)).collect()
        } else {
          rows.map(|row| json!(row)).collect()
        };
        Ok(Evaluated::List(list))
      }
    }
  }

  fn eval_collection(&self, query: &Query) -> Result<Vec<Feature>> {
    match self.eval(query)? {
      Evaluated::Collection(features) => Ok(features),
      _ => bail!("expected a feature collection from {:?}", query.output()),
    }
  }

  fn eval_values(&self, values: &ValueList) -> Result<HashSet<String>> {
    match values {
      ValueList::Literal(values) => Ok(values.iter().cloned().collect()),
      ValueList::Computed(query) => match self.eval(query)? {
        Evaluated::List(items) => items
          .into_iter()
          .map(|item| match item {
            Value::String(value) => Ok(value),
            other => bail!("computed filter list must contain strings, got {other}"),
          })
          .collect(),
        _ => bail!("computed filter list must be a single-property projection"),
      },
    }
  }
}

impl HostPlatform for InMemoryHost {
  fn evaluate(&self, query: &Query) -> Result<Value> {
    debug!(asset = query.asset_path(), output = ?query.output(), "evaluating in memory");
    let value = match self.eval(query)? {
      Evaluated::Collection(features) => json!({
        "type": "FeatureCollection",
        "features": features
          .iter()
          .map(|feature| {
            json!({
              "type": "Feature",
              "properties": feature.properties,
              "geometry": feature.geometry,
            })
          })
          .collect::<Vec<_>>(),
      }),
      Evaluated::Geometry(geometry) => serde_json::to_value(geometry)?,
      Evaluated::List(items) => Value::Array(items),
    };
    Ok(value)
  }
}
