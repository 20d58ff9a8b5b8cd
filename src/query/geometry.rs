//! GeoJSON-shaped geometries passed to the host as intersection arguments.

use serde::{Deserialize, Serialize};

/// A `[longitude, latitude]` pair.
pub type Position = [f64; 2];

/// Geometry value in GeoJSON layout (`{"type": ..., "coordinates": ...}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
  /// Single position.
  Point(Position),
  /// Connected sequence of positions.
  LineString(Vec<Position>),
  /// Outer ring followed by optional holes.
  Polygon(Vec<Vec<Position>>),
  /// Several polygons treated as one geometry.
  MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl Geometry {
  /// Axis-aligned rectangle polygon, the usual "area of interest" argument.
  pub fn rectangle(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
    Geometry::Polygon(vec![vec![
      [min_lon, min_lat],
      [max_lon, min_lat],
      [max_lon, max_lat],
      [min_lon, max_lat],
      [min_lon, min_lat],
    ]])
  }

  /// Bounding box of every position, or `None` for an empty geometry.
  pub fn bounds(&self) -> Option<BoundingBox> {
    let positions: Box<dyn Iterator<Item = &Position> + '_> = match self {
      Geometry::Point(position) => Box::new(std::iter::once(position)),
      Geometry::LineString(line) => Box::new(line.iter()),
      Geometry::Polygon(rings) => Box::new(rings.iter().flatten()),
      Geometry::MultiPolygon(polygons) => Box::new(polygons.iter().flatten().flatten()),
    };
    BoundingBox::from_positions(positions)
  }

  /// Rings of the polygonal members; points and lines contribute nothing.
  pub(crate) fn polygons(&self) -> Vec<Vec<Vec<Position>>> {
    match self {
      Geometry::Polygon(rings) => vec![rings.clone()],
      Geometry::MultiPolygon(polygons) => polygons.clone(),
      Geometry::Point(_) | Geometry::LineString(_) => Vec::new(),
    }
  }
}

/// Axis-aligned bounds in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
  /// Western edge.
  pub min_lon: f64,
  /// Southern edge.
  pub min_lat: f64,
  /// Eastern edge.
  pub max_lon: f64,
  /// Northern edge.
  pub max_lat: f64,
}

impl BoundingBox {
  fn from_positions<'a>(positions: impl Iterator<Item = &'a Position>) -> Option<Self> {
    positions.fold(None, |acc: Option<BoundingBox>, [lon, lat]| {
      Some(match acc {
        None => BoundingBox {
          min_lon: *lon,
          min_lat: *lat,
          max_lon: *lon,
          max_lat: *lat,
        },
        Some(bounds) => BoundingBox {
          min_lon: bounds.min_lon.min(*lon),
          min_lat: bounds.min_lat.min(*lat),
          max_lon: bounds.max_lon.max(*lon),
          max_lat: bounds.max_lat.max(*lat),
        },
      })
    })
  }

  /// Returns true when the boxes overlap or touch.
  pub fn intersects(&self, other: &BoundingBox) -> bool {
    self.min_lon <= other.max_lon
      && other.min_lon <= self.max_lon
      && self.min_lat <= other.max_lat
      && other.min_lat <= self.max_lat
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn deserialises_geojson_polygons() {
    let geometry: Geometry = serde_json::from_str(
      r#"{"type": "Polygon",
          "coordinates": [[[29.0, -2.0], [30.0, -2.0], [30.0, -1.0], [29.0, -2.0]]]}"#,
    )
    .unwrap();

    let bounds = geometry.bounds().unwrap();
    assert_eq!(bounds.min_lon, 29.0);
    assert_eq!(bounds.max_lat, -1.0);
  }

  #[test]
  fn rectangle_bounds_match_its_corners() {
    let bounds = Geometry::rectangle(-1.0, 2.0, 3.0, 4.0).bounds().unwrap();
    assert_eq!(
      bounds,
      BoundingBox {
        min_lon: -1.0,
        min_lat: 2.0,
        max_lon: 3.0,
        max_lat: 4.0,
      }
    );
  }

  #[test]
  fn empty_geometries_have_no_bounds() {
    assert_eq!(Geometry::LineString(Vec::new()).bounds(), None);
    assert_eq!(Geometry::MultiPolygon(Vec::new()).bounds(), None);
  }

  #[test]
  fn touching_boxes_intersect_and_disjoint_ones_do_not() {
    let a = Geometry::rectangle(0.0, 0.0, 1.0, 1.0).bounds().unwrap();
    let b = Geometry::rectangle(1.0, 1.0, 2.0, 2.0).bounds().unwrap();
    let c = Geometry::Point([5.0, 5.0]).bounds().unwrap();
    assert!(a.intersects(&b));
    assert!(!a.intersects(&c));
  }
}
