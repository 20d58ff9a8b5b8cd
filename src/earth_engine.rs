//! Render descriptors as Earth Engine REST expression graphs.
//!
//! The output is the `Expression` document accepted by the `value:compute` and
//! `table:computeFeatures` endpoints. Nodes are nested rather than deduplicated into the
//! `values` table, which the service accepts as long as the root is named by `result`.
//! Transport and authentication stay with the caller.

use serde_json::{Map, Value, json};

use crate::models::FeatureProperty;
use crate::query::{Filter, Geometry, Query, ValueList};

const RESULT_KEY: &str = "0";

/// Wrap a descriptor as a complete expression document.
pub fn encode_expression(query: &Query) -> Value {
  json!({
    "result": RESULT_KEY,
    "values": { RESULT_KEY: encode_value(query) },
  })
}

/// Encode a descriptor as a single expression node.
pub fn encode_value(query: &Query) -> Value {
  match query {
    Query::Asset { path } => invoke("Collection.loadTable", [("tableId", constant(path))]),
    Query::Filter { source, filter } => invoke(
      "Collection.filter",
      [("collection", encode_value(source)), ("filter", encode_filter(filter))],
    ),
    Query::Union { source } => {
      let merged = invoke("Collection.union", [("collection", encode_value(source))]);
      invoke("Collection.geometry", [("collection", merged)])
    }
    Query::Project { source, properties } => encode_projection(source, properties),
  }
}

fn encode_projection(source: &Query, properties: &[FeatureProperty]) -> Value {
  let reducer = if properties.len() == 1 {
    invoke("Reducer.toList", [])
  } else {
    invoke("Reducer.toList", [("tupleSize", constant(properties.len()))])
  };
  let selectors: Vec<&str> = properties.iter().map(|property| property.as_str()).collect();
  let reduced = invoke(
    "Collection.reduceColumns",
    [
      ("collection", encode_value(source)),
      ("reducer", reducer),
      ("selectors", constant(selectors)),
    ],
  );
  invoke(
    "Dictionary.get",
    [("dictionary", reduced), ("key", constant("list"))],
  )
}

fn encode_filter(filter: &Filter) -> Value {
  match filter {
    Filter::InList { property, values } => {
      let right = match values {
        ValueList::Literal(values) => constant(values),
        ValueList::Computed(query) => encode_value(query),
      };
      invoke(
        "Filter.inList",
        [("leftField", constant(property.as_str())), ("rightValue", right)],
      )
    }
    Filter::Intersects { geometry } => {
      let feature = invoke("Feature", [("geometry", encode_geometry(geometry))]);
      invoke(
        "Filter.intersects",
        [("leftField", constant(".all")), ("rightValue", feature)],
      )
    }
  }
}

/// Encode a geometry through the matching `GeometryConstructors` function.
pub fn encode_geometry(geometry: &Geometry) -> Value {
  let (name, coordinates) = match geometry {
    Geometry::Point(position) => ("GeometryConstructors.Point", constant(position)),
    Geometry::LineString(line) => ("GeometryConstructors.LineString", constant(line)),
    Geometry::Polygon(rings) => ("GeometryConstructors.Polygon", constant(rings)),
    Geometry::MultiPolygon(polygons) => ("GeometryConstructors.MultiPolygon", constant(polygons)),
  };
  invoke(name, [("coordinates", coordinates)])
}

fn invoke<const N: usize>(function_name: &str, arguments: [(&str, Value); N]) -> Value {
  let arguments: Map<String, Value> = arguments
    .into_iter()
    .map(|(name, value)| (name.to_string(), value))
    .collect();
  json!({
    "functionInvocationValue": {
      "functionName": function_name,
      "arguments": arguments,
    }
  })
}

fn constant(value: impl serde::Serialize) -> Value {
  json!({ "constantValue": value })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn function_name(node: &Value) -> &str {
    node["functionInvocationValue"]["functionName"]
      .as_str()
      .unwrap_or_default()
  }

  fn argument<'a>(node: &'a Value, name: &str) -> &'a Value {
    &node["functionInvocationValue"]["arguments"][name]
  }

  #[test]
  fn wraps_root_node_in_expression_document() {
    let expression = encode_expression(&Query::asset("projects/x/v1/RWA/ADM0"));

    assert_eq!(expression["result"], "0");
    let root = &expression["values"]["0"];
    assert_eq!(function_name(root), "Collection.loadTable");
    assert_eq!(
      argument(root, "tableId")["constantValue"],
      "projects/x/v1/RWA/ADM0"
    );
  }

  #[test]
  fn encodes_in_list_filters_with_literal_values() {
    let query =
      Query::asset("a").filter_in_list(FeatureProperty::ShapeName, ["Kigali", "Kigali"]);
    let node = encode_value(&query);

    assert_eq!(function_name(&node), "Collection.filter");
    let filter = argument(&node, "filter");
    assert_eq!(function_name(filter), "Filter.inList");
    assert_eq!(argument(filter, "leftField")["constantValue"], "shapeName");
    assert_eq!(
      argument(filter, "rightValue")["constantValue"],
      json!(["Kigali", "Kigali"])
    );
  }

  #[test]
  fn encodes_bounds_filters_as_feature_intersection() {
    let query = Query::asset("a").filter_bounds(Geometry::Point([30.0, -2.0]));
    let filter = argument(&encode_value(&query), "filter").clone();

    assert_eq!(function_name(&filter), "Filter.intersects");
    let feature = argument(&filter, "rightValue");
    assert_eq!(function_name(feature), "Feature");
    let geometry = argument(feature, "geometry");
    assert_eq!(function_name(geometry), "GeometryConstructors.Point");
    assert_eq!(argument(geometry, "coordinates")["constantValue"], json!([30.0, -2.0]));
  }

  #[test]
  fn single_projection_reads_the_list_key() {
    let query = Query::asset("a").project(vec![FeatureProperty::ShapeId]);
    let node = encode_value(&query);

    assert_eq!(function_name(&node), "Dictionary.get");
    assert_eq!(argument(&node, "key")["constantValue"], "list");
    let reduced = argument(&node, "dictionary");
    assert_eq!(function_name(reduced), "Collection.reduceColumns");
    assert_eq!(argument(reduced, "selectors")["constantValue"], json!(["shapeID"]));
    let reducer = argument(reduced, "reducer");
    assert_eq!(function_name(reducer), "Reducer.toList");
    assert!(argument(reducer, "tupleSize").is_null());
  }

  #[test]
  fn paired_projection_uses_tuple_reducer() {
    let query = Query::asset("a").project(vec![
      FeatureProperty::ShapeName,
      FeatureProperty::ShapeId,
    ]);
    let reduced = argument(&encode_value(&query), "dictionary").clone();

    assert_eq!(
      argument(&reduced, "selectors")["constantValue"],
      json!(["shapeName", "shapeID"])
    );
    assert_eq!(
      argument(argument(&reduced, "reducer"), "tupleSize")["constantValue"],
      2
    );
  }

  #[test]
  fn union_extracts_merged_geometry() {
    let node = encode_value(&Query::asset("a").union());

    assert_eq!(function_name(&node), "Collection.geometry");
    assert_eq!(function_name(argument(&node, "collection")), "Collection.union");
  }

  #[test]
  fn computed_lists_embed_their_projection() {
    let codes = Query::asset("a")
      .filter_bounds(Geometry::rectangle(0.0, 0.0, 1.0, 1.0))
      .project(vec![FeatureProperty::ShapeId]);
    let query = Query::asset("a").filter(Filter::InList {
      property: FeatureProperty::ShapeId,
      values: ValueList::Computed(Box::new(codes)),
    });

    let filter = argument(&encode_value(&query), "filter").clone();
    assert_eq!(function_name(argument(&filter, "rightValue")), "Dictionary.get");
  }
}
