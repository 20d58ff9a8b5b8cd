//! Command-line parser and dispatch for `geoboundaries`.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use geoboundaries_ee::{
    AssetPathPattern, CatalogConfig, CountryCode, GeoBoundaries, Geometry, HostPlatform,
    InMemoryHost, Query, docs, earth_engine, filter_by_codes, filter_by_names, union_by_codes,
    union_by_names,
};

#[derive(Parser)]
#[command(name = "geoboundaries")]
#[command(about = "Resolve and query geoBoundaries administrative boundary assets")]
pub struct Cli {
    /// Config file, or a directory holding geoboundaries.config.json (defaults to the cwd)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Known-assets registry file (JSON or YAML), overriding the configured one
    #[arg(long, global = true)]
    known_assets: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Print the library version
    Version,

    /// Print help for one library function, or for all of them
    Docs {
        /// Function name, e.g. get_asset
        func: Option<String>,
    },

    /// Print the catalog path of an asset (which may or may not exist)
    Resolve {
        #[command(flatten)]
        asset: AssetArgs,
    },

    /// Check the known-assets registry; exits with status 1 when the asset is not listed
    Exists {
        #[command(flatten)]
        asset: AssetArgs,
    },

    /// List registry entries
    Assets {
        /// Only list assets of this country code
        #[arg(long)]
        country: Option<String>,
    },

    /// Build a query for an asset at the default release
    Query {
        /// What to read from the asset
        #[arg(value_enum)]
        kind: QueryKind,
        /// 3-letter country code, or WLD
        code: String,
        /// Administrative level, ADM0 to ADM4
        level: String,
        /// Only keep features intersecting this box
        #[arg(
            long,
            num_args = 4,
            allow_negative_numbers = true,
            value_names = ["MIN_LON", "MIN_LAT", "MAX_LON", "MAX_LAT"]
        )]
        bbox: Option<Vec<f64>>,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Select features of an asset by shapeID or shapeName, optionally dissolving them
    Select {
        #[command(flatten)]
        asset: AssetArgs,
        /// shapeID codes to keep
        #[arg(
            long,
            value_delimiter = ',',
            conflicts_with = "names",
            required_unless_present = "names"
        )]
        codes: Vec<String>,
        /// shapeNames to keep (names are not unique)
        #[arg(long, value_delimiter = ',')]
        names: Vec<String>,
        /// Return the union geometry instead of the features
        #[arg(long)]
        union: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct AssetArgs {
    /// 3-letter country code, or WLD
    code: String,
    /// Administrative level, ADM0 to ADM4
    level: String,
    /// geoBoundaries release, e.g. 3_0_0 (defaults to the configured release)
    #[arg(long = "version", value_name = "V")]
    release: Option<String>,
}

#[derive(Args)]
struct OutputArgs {
    /// Output encoding of the query
    #[arg(long, value_enum, default_value_t = OutputFormat::Descriptor)]
    format: OutputFormat,
    /// Evaluate offline against this GeoJSON FeatureCollection instead of printing the query
    #[arg(long, value_name = "FILE")]
    geojson: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum QueryKind {
    /// The asset's features
    Features,
    /// shapeID list
    Codes,
    /// shapeName list
    Names,
    /// (shapeName, shapeID) pairs
    NamesAndCodes,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Engine-neutral query descriptor
    #[default]
    Descriptor,
    /// Earth Engine REST expression
    EarthEngine,
}

/// Parse arguments and run the selected command.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        info!("verbose logging enabled");
    }

    match cli.command {
        Commands::Version => println!("{}", geoboundaries_ee::version()),
        Commands::Docs { ref func } => println!("{}", docs(func.as_deref())?),
        Commands::Resolve { ref asset } => {
            let catalog = load_catalog(&cli)?;
            let path =
                catalog.resolve_asset_name(&asset.code, &asset.level, asset.release.as_deref())?;
            println!("{path}");
        }
        Commands::Exists { ref asset } => {
            let catalog = load_catalog(&cli)?;
            let exists =
                catalog.asset_exists(&asset.code, &asset.level, asset.release.as_deref())?;
            println!("{exists}");
            if !exists {
                std::process::exit(1);
            }
        }
        Commands::Assets { ref country } => {
            let catalog = load_catalog(&cli)?;
            list_assets(&catalog, country.as_deref())?;
        }
        Commands::Query {
            kind,
            ref code,
            ref level,
            ref bbox,
            ref output,
        } => {
            let catalog = load_catalog(&cli)?;
            let intersecting = bbox.as_deref().map(bbox_geometry).transpose()?;
            let intersecting = intersecting.as_ref();
            let query = match kind {
                QueryKind::Features => catalog.get_features(code, level, intersecting)?,
                QueryKind::Codes => catalog.list_codes(code, level, intersecting)?,
                QueryKind::Names => catalog.list_names(code, level, intersecting)?,
                QueryKind::NamesAndCodes => {
                    catalog.list_names_and_codes(code, level, intersecting)?
                }
            };
            emit(&query, output)?;
        }
        Commands::Select {
            ref asset,
            ref codes,
            ref names,
            union,
            ref output,
        } => {
            let catalog = load_catalog(&cli)?;
            let collection =
                catalog.get_asset(&asset.code, &asset.level, asset.release.as_deref())?;
            let query = match (codes.is_empty(), union) {
                (false, false) => filter_by_codes(collection, codes),
                (false, true) => union_by_codes(collection, codes),
                (true, false) => filter_by_names(collection, names),
                (true, true) => union_by_names(collection, names),
            };
            emit(&query, output)?;
        }
    }

    Ok(())
}

fn load_catalog(cli: &Cli) -> anyhow::Result<GeoBoundaries> {
    let mut config = match &cli.config {
        Some(path) if path.is_dir() => CatalogConfig::discover(path),
        Some(path) => CatalogConfig::from_path(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => CatalogConfig::discover(&std::env::current_dir()?),
    };
    if let Some(path) = &cli.known_assets {
        config.known_assets_path = Some(path.to_string_lossy().into_owned());
    }

    let catalog = GeoBoundaries::from_config(&config)?;
    info!(
        base_path = catalog.resolver().base_path(),
        default_version = catalog.resolver().default_version(),
        known_assets = catalog.known_assets().len(),
        "catalog ready"
    );
    Ok(catalog)
}

fn list_assets(catalog: &GeoBoundaries, country: Option<&str>) -> anyhow::Result<()> {
    if let Some(snapshot) = catalog.known_assets().snapshot() {
        info!(snapshot, "listing known assets");
    }

    match country {
        Some(code) => {
            let code = CountryCode::parse(code)?;
            let pattern = AssetPathPattern::new(catalog.resolver());
            for asset in catalog.known_assets().assets_for(&pattern, &code) {
                println!("{}", catalog.resolver().render(&asset));
            }
        }
        None => {
            for path in catalog.known_assets().paths() {
                println!("{path}");
            }
        }
    }
    Ok(())
}

fn bbox_geometry(values: &[f64]) -> anyhow::Result<Geometry> {
    let &[min_lon, min_lat, max_lon, max_lat] = values else {
        bail!("--bbox takes exactly four numbers, got {}", values.len());
    };
    if min_lon > max_lon || min_lat > max_lat {
        bail!("--bbox minimum corner must not exceed the maximum corner");
    }
    Ok(Geometry::rectangle(min_lon, min_lat, max_lon, max_lat))
}

fn emit(query: &Query, output: &OutputArgs) -> anyhow::Result<()> {
    let value = match (&output.geojson, output.format) {
        (Some(file), _) => evaluate_offline(query, file)?,
        (None, OutputFormat::Descriptor) => serde_json::to_value(query)?,
        (None, OutputFormat::EarthEngine) => earth_engine::encode_expression(query),
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn evaluate_offline(query: &Query, file: &Path) -> anyhow::Result<serde_json::Value> {
    let mut host = InMemoryHost::new();
    host.load_geojson_file(query.asset_path(), file)?;
    host.evaluate(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_bbox_corners() {
        let cli = Cli::try_parse_from([
            "geoboundaries",
            "query",
            "codes",
            "RWA",
            "ADM2",
            "--bbox",
            "29.0",
            "-2.0",
            "30.0",
            "-1.0",
        ])
        .unwrap();
        let Commands::Query { kind, bbox, .. } = cli.command else {
            panic!("expected query command");
        };
        assert_eq!(kind, QueryKind::Codes);
        assert_eq!(bbox, Some(vec![29.0, -2.0, 30.0, -1.0]));
    }

    #[test]
    fn select_requires_codes_or_names() {
        assert!(Cli::try_parse_from(["geoboundaries", "select", "RWA", "ADM2"]).is_err());
        let cli = Cli::try_parse_from([
            "geoboundaries",
            "select",
            "RWA",
            "ADM2",
            "--names",
            "Musanze,Gasabo",
            "--union",
        ])
        .unwrap();
        let Commands::Select { names, union, .. } = cli.command else {
            panic!("expected select command");
        };
        assert_eq!(names, vec!["Musanze", "Gasabo"]);
        assert!(union);
    }

    #[test]
    fn subcommand_version_flag_sets_release() {
        let cli = Cli::try_parse_from([
            "geoboundaries",
            "resolve",
            "RWA",
            "ADM1",
            "--version",
            "4_0_0",
        ])
        .unwrap();
        let Commands::Resolve { asset } = cli.command else {
            panic!("expected resolve command");
        };
        assert_eq!(asset.release.as_deref(), Some("4_0_0"));
    }

    #[test]
    fn inverted_bbox_is_rejected() {
        assert!(bbox_geometry(&[30.0, -1.0, 29.0, -2.0]).is_err());
        assert!(bbox_geometry(&[29.0, -2.0, 30.0, -1.0]).is_ok());
    }
}
