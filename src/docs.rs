//! Built-in help text for the public helpers.

use crate::error::{GeoBoundariesError, Result};

const CODE_ARG: &str = concat!(
  "  code : &str\n",
  "    3-letter capitalized country code, looks like \"USA\", \"MEX\", \"RWA\", \"ETH\", ....\n",
  "    \"WLD\" selects the global composite layer.\n",
);
const LEVEL_ARG: &str = concat!(
  "  level : &str\n",
  "    administrative level, must be one of \"ADM0\", \"ADM1\", \"ADM2\", \"ADM3\", \"ADM4\"\n",
);
const VERSION_ARG: &str = concat!(
  "  version : Option<&str>\n",
  "    geoBoundaries release - if None then \"3_0_0\" is used\n",
);
const INTERSECTING_ARG: &str = concat!(
  "  intersecting : Option<&Geometry>\n",
  "    geometry used to filter features by intersection before reading them.\n",
);
const COLLECTION_ARG: &str = concat!(
  "  collection : Query\n",
  "    descriptor of features that share the properties of geoBoundaries data\n",
);
const CODES_ARG: &str = concat!(
  "  codes : IntoIterator<Item = impl Into<String>>\n",
  "    shapeID codes to keep\n",
);
const NAMES_ARG: &str = concat!(
  "  names : IntoIterator<Item = impl Into<String>>\n",
  "    shapeNames to keep\n",
);
const FUNC_ARG: &str = concat!(
  "  func : Option<&str>\n",
  "    name of the function to document; every function when None\n",
);

/// Name and summary of every documented function, in presentation order.
const FUNCTIONS: &[(&str, &str)] = &[
  ("version", "Get a string of the library version."),
  (
    "docs",
    "Get documentation for one function, or for every function when `func` is None.\n\
     Fails with UnknownFunction when `func` is not documented.",
  ),
  (
    "asset_exists",
    "Get a bool of whether an asset is listed in the known-assets registry.\n\
     The registry is a snapshot; evaluate `get_asset` on the host for an authoritative answer.",
  ),
  (
    "resolve_asset_name",
    "Get a string of an asset name, which may or may not exist.",
  ),
  (
    "get_asset",
    "Get a descriptor of an asset's FeatureCollection.\n\
     The host fails when the asset does not exist.",
  ),
  (
    "filter_by_codes",
    "Filter a collection by a list of unique `shapeID` codes (inclusive).",
  ),
  (
    "filter_by_names",
    "Filter a collection by a list of `shapeName`s (inclusive).\n\
     Names are not guaranteed unique; every feature sharing a listed name is kept.\n\
     Prefer `filter_by_codes` when possible.",
  ),
  (
    "union_by_codes",
    "Get the geometric union of the features selected by `filter_by_codes`.",
  ),
  (
    "union_by_names",
    "Get the geometric union of the features selected by `filter_by_names`,\n\
     with the caveats described there.",
  ),
  (
    "list_codes",
    "Get a list of `shapeID`s at the default release.\n\
     If `intersecting` is supplied, only features intersecting it are listed.",
  ),
  (
    "list_names",
    "Get a list of `shapeName`s at the default release.\n\
     If `intersecting` is supplied, only features intersecting it are listed.",
  ),
  (
    "list_names_and_codes",
    "Get a list of (`shapeName`, `shapeID`) pairs read in a single projection.\n\
     If `intersecting` is supplied, only features intersecting it are listed.",
  ),
  (
    "get_features",
    "Get a descriptor of an asset's features at the default release.\n\
     If `intersecting` is supplied, the asset is filtered by the codes of intersecting features.\n\
     Use `get_asset` if the intersection is not needed.",
  ),
];

fn parameters(name: &str) -> &'static str {
  match name {
    "version" => "()",
    "docs" => "(func)",
    "asset_exists" | "resolve_asset_name" | "get_asset" => "(code, level, version)",
    "filter_by_codes" | "union_by_codes" => "(collection, codes)",
    "filter_by_names" | "union_by_names" => "(collection, names)",
    _ => "(code, level, intersecting)",
  }
}

fn arguments(name: &str) -> &'static [&'static str] {
  match name {
    "version" => &[],
    "docs" => &[FUNC_ARG],
    "asset_exists" | "resolve_asset_name" | "get_asset" => &[CODE_ARG, LEVEL_ARG, VERSION_ARG],
    "filter_by_codes" | "union_by_codes" => &[COLLECTION_ARG, CODES_ARG],
    "filter_by_names" | "union_by_names" => &[COLLECTION_ARG, NAMES_ARG],
    _ => &[CODE_ARG, LEVEL_ARG, INTERSECTING_ARG],
  }
}

fn render(name: &str, summary: &str) -> String {
  let title = format!("{name}{}", parameters(name));
  let mut text = format!("{title}\n{}\n{summary}\n", "=".repeat(title.len()));

  let args = arguments(name);
  if !args.is_empty() {
    text.push_str("  \n");
    for arg in args {
      text.push_str(arg);
    }
  }
  text
}

/// Names of every documented function.
pub fn function_names() -> impl Iterator<Item = &'static str> {
  FUNCTIONS.iter().map(|(name, _)| *name)
}

/// Help text for `func`, or for every function joined by blank lines when `func` is `None`.
pub fn docs(func: Option<&str>) -> Result<String> {
  match func {
    None => Ok(
      FUNCTIONS
        .iter()
        .map(|(name, summary)| render(name, summary))
        .collect::<Vec<_>>()
        .join("\n"),
    ),
    Some(func) => FUNCTIONS
      .iter()
      .find(|(name, _)| *name == func)
      .map(|(name, summary)| render(name, summary))
      .ok_or_else(|| GeoBoundariesError::UnknownFunction(func.to_string())),
  }
}

/// Print [`docs`] to standard output.
pub fn print_docs(func: Option<&str>) -> Result<()> {
  println!("{}", docs(func)?);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_underlined_signature_and_arguments() {
    let text = docs(Some("resolve_asset_name")).unwrap();
    let mut lines = text.lines();
    let title = lines.next().unwrap();
    assert_eq!(title, "resolve_asset_name(code, level, version)");
    assert_eq!(lines.next().unwrap(), "=".repeat(title.len()));
    assert!(text.contains("\"3_0_0\""));
  }

  #[test]
  fn unknown_function_is_an_error() {
    assert_eq!(
      docs(Some("getGeoBoundariesAsset")),
      Err(GeoBoundariesError::UnknownFunction("getGeoBoundariesAsset".into()))
    );
  }

  #[test]
  fn all_docs_cover_every_function_in_order() {
    let text = docs(None).unwrap();
    let mut cursor = 0;
    for name in function_names() {
      let offset = text[cursor..]
        .find(&format!("{name}("))
        .unwrap_or_else(|| panic!("{name} missing from docs"));
      cursor += offset;
    }
    assert_eq!(function_names().count(), 13);
  }

  #[test]
  fn titles_follow_each_signature() {
    assert!(docs(Some("version")).unwrap().starts_with("version()\n"));
    assert!(docs(Some("docs")).unwrap().starts_with("docs(func)\n"));
  }
}
