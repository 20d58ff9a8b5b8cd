//! Request descriptors handed to the host platform.
//!
//! Every helper in this crate produces a [`Query`] instead of calling the host directly. A
//! descriptor is plain data: it can be inspected, serialised, rendered as an Earth Engine
//! expression by [`crate::earth_engine`], or evaluated by any [`crate::HostPlatform`].

mod geometry;

use serde::{Deserialize, Serialize};

use crate::models::FeatureProperty;

pub use geometry::{BoundingBox, Geometry, Position};

/// Description of a host-side computation over a feature collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Query {
  /// Load the feature collection published at `path`.
  Asset {
    /// Catalog path of the collection.
    path: String,
  },
  /// Keep the features of `source` matching `filter`, in collection order.
  Filter {
    /// Collection to filter.
    source: Box<Query>,
    /// Predicate applied to each feature.
    filter: Filter,
  },
  /// Geometric union of every geometry in `source`.
  Union {
    /// Collection whose geometries are merged.
    source: Box<Query>,
  },
  /// Read `properties` from every feature of `source`.
  ///
  /// A single property yields a flat list of values; several properties yield one tuple per
  /// feature, so paired columns cannot drift out of alignment.
  Project {
    /// Collection to read.
    source: Box<Query>,
    /// Properties to read, in tuple order.
    properties: Vec<FeatureProperty>,
  },
}

/// Predicate used by [`Query::Filter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Filter {
  /// Property value is one of `values`.
  InList {
    /// Property compared against the list.
    property: FeatureProperty,
    /// Accepted values.
    values: ValueList,
  },
  /// Feature geometry intersects `geometry`.
  Intersects {
    /// Area of interest.
    geometry: Geometry,
  },
}

/// List operand of [`Filter::InList`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueList {
  /// Values supplied by the caller.
  Literal(Vec<String>),
  /// Values produced on the host by another descriptor (a single-property projection).
  Computed(Box<Query>),
}

/// Shape of the value a descriptor evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutput {
  /// A feature collection.
  Collection,
  /// A single geometry.
  Geometry,
  /// A list of values or tuples.
  List,
}

impl Query {
  /// Load the collection published at `path`.
  pub fn asset(path: impl Into<String>) -> Self {
    Query::Asset { path: path.into() }
  }

  /// Keep features matching `filter`.
  pub fn filter(self, filter: Filter) -> Self {
    Query::Filter {
      source: Box::new(self),
      filter,
    }
  }

  /// Keep features whose `property` is one of `values`.
  pub fn filter_in_list<I, S>(self, property: FeatureProperty, values: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.filter(Filter::InList {
      property,
      values: ValueList::Literal(values.into_iter().map(Into::into).collect()),
    })
  }

  /// Keep features intersecting `geometry`.
  pub fn filter_bounds(self, geometry: Geometry) -> Self {
    self.filter(Filter::Intersects { geometry })
  }

  /// Merge every geometry into one.
  pub fn union(self) -> Self {
    Query::Union {
      source: Box::new(self),
    }
  }

  /// Read `properties` from every feature.
  pub fn project(self, properties: Vec<FeatureProperty>) -> Self {
    Query::Project {
      source: Box::new(self),
      properties,
    }
  }

  /// What the descriptor evaluates to.
  pub fn output(&self) -> QueryOutput {
    match self {
      Query::Asset { .. } | Query::Filter { .. } => QueryOutput::Collection,
      Query::Union { .. } => QueryOutput::Geometry,
      Query::Project { .. } => QueryOutput::List,
    }
  }

  /// Catalog path of the collection at the root of the descriptor.
  pub fn asset_path(&self) -> &str {
    match self {
      Query::Asset { path } => path,
      Query::Filter { source, .. } | Query::Union { source } | Query::Project { source, .. } => {
        source.asset_path()
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builders_nest_sources_and_report_output() {
    let query = Query::asset("a/b")
      .filter_in_list(FeatureProperty::ShapeId, ["X", "Y"])
      .union();

    assert_eq!(query.output(), QueryOutput::Geometry);
    assert_eq!(query.asset_path(), "a/b");
    let Query::Union { source } = &query else {
      panic!("expected a union");
    };
    assert_eq!(source.output(), QueryOutput::Collection);
  }

  #[test]
  fn serialises_as_tagged_descriptor() {
    let query = Query::asset("a/b").project(vec![FeatureProperty::ShapeName]);
    let json = serde_json::to_value(&query).unwrap();

    assert_eq!(
      json,
      serde_json::json!({
        "op": "project",
        "source": {"op": "asset", "path": "a/b"},
        "properties": ["shapeName"],
      })
    );
    let back: Query = serde_json::from_value(json).unwrap();
    assert_eq!(back, query);
  }

  #[test]
  fn computed_value_lists_nest_queries() {
    let codes = Query::asset("a/b").project(vec![FeatureProperty::ShapeId]);
    let query = Query::asset("a/b").filter(Filter::InList {
      property: FeatureProperty::ShapeId,
      values: ValueList::Computed(Box::new(codes)),
    });

    let json = serde_json::to_value(&query).unwrap();
    assert_eq!(json["filter"]["kind"], "in_list");
    assert_eq!(json["filter"]["values"]["computed"]["op"], "project");
  }
}
