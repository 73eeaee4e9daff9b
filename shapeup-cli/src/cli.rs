//! Définition et implémentation des commandes CLI
//!
//! - `utm` : zone UTM d'une latitude / longitude
//! - `locate` : position WGS-84 d'un point exprimé dans une référence
//! - `buffer` : zone tampon autour d'un point, exportée en JSON
//! - `transform` : reprojection de géométries exportées (une ou un tableau)
//! - `version`

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::{json, Value};
use shapeup::{
    transform_all, LatLon, ProjectionEngine, Sr, SrContext, SrGeometry, Units, UtmZone,
};
use tracing::{debug, info, warn};

use crate::config::Config;

#[derive(Subcommand)]
pub enum Commands {
    /// Print the UTM zone reference containing a latitude / longitude
    Utm {
        /// Latitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },

    /// Print the WGS-84 location of a point expressed in a spatial reference
    Locate {
        /// X coordinate (easting or longitude)
        #[arg(short, allow_negative_numbers = true)]
        x: f64,

        /// Y coordinate (northing or latitude)
        #[arg(short, allow_negative_numbers = true)]
        y: f64,

        /// Spatial reference of the point (alias, "epsg:32615" or bare code)
        #[arg(long, default_value = "4326")]
        sr: String,
    },

    /// Buffer a WGS-84 point and print the exported polygon
    Buffer {
        /// Latitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Buffer distance
        #[arg(short, long)]
        distance: f64,

        /// Distance units (meters, kilometers). Default from the config
        #[arg(short, long)]
        units: Option<String>,
    },

    /// Transform exported geometries (one object or an array) to a reference
    Transform {
        /// Input JSON file, "-" for stdin
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Target spatial reference
        #[arg(long)]
        sr: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print version and available projection engines
    Version,
}

/// Zone UTM d'un couple latitude / longitude
pub fn cmd_utm(lat: f64, lon: f64) -> Result<()> {
    let ctx = SrContext::global();
    let sr = ctx.utm(lat, lon);
    let zone = UtmZone::containing(lat, lon);

    info!(lat, lon, band = zone.band, south = zone.south, "UTM zone resolved");
    println!("{}", sr);
    Ok(())
}

/// Position WGS-84 d'un point
pub fn cmd_locate(x: f64, y: f64, sr: &str, config: &Config) -> Result<()> {
    let sr = config.parse_sr(sr)?;
    let document = locate_document(SrContext::global(), x, y, &sr)?;
    print_json(&document, config.pretty)
}

/// Zone tampon autour d'un point WGS-84
pub fn cmd_buffer(
    lat: f64,
    lon: f64,
    distance: f64,
    units: Option<&str>,
    config: &Config,
) -> Result<()> {
    let units = config.units(units)?;
    info!(lat, lon, distance, units = %units, "Buffering point");

    let document = buffer_document(SrContext::global(), lat, lon, distance, units)?;
    print_json(&document, config.pretty)
}

/// Reprojection de géométries exportées
pub fn cmd_transform(input: &str, sr: &str, output: Option<&Path>, config: &Config) -> Result<()> {
    let target = config.parse_sr(sr)?;

    let content = if input == "-" {
        std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?
    } else {
        std::fs::read_to_string(input).context(format!("Failed to read input file: {}", input))?
    };
    let document: Value = serde_json::from_str(&content).context("Failed to parse input JSON")?;

    let transformed = transform_document(SrContext::global(), &document, &target)?;

    match output {
        Some(path) => {
            let text = render_json(&transformed, config.pretty)?;
            std::fs::write(path, text)
                .context(format!("Failed to write output file: {}", path.display()))?;
            info!(output = %path.display(), sr = %target, "Geometries written");
        }
        None => print_json(&transformed, config.pretty)?,
    }
    Ok(())
}

pub fn cmd_version() -> Result<()> {
    let engines = if cfg!(feature = "reproject") {
        "lite, proj"
    } else {
        "lite"
    };
    println!("shapeup {} (engines: {})", env!("CARGO_PKG_VERSION"), engines);
    Ok(())
}

fn locate_document<E: ProjectionEngine>(
    ctx: &SrContext<E>,
    x: f64,
    y: f64,
    sr: &Sr,
) -> Result<Value> {
    let point = SrGeometry::from_coords(x, y, sr.clone());
    let wgs84 = point
        .as_wgs84(ctx)
        .context(format!("Cannot locate point in {}", sr))?;

    let (lon, lat) = match (wgs84.x(), wgs84.y()) {
        (Some(lon), Some(lat)) => (lon, lat),
        _ => anyhow::bail!("Transformed geometry is not a point"),
    };
    debug!(x, y, sr = %sr, lat, lon, "Point located");

    Ok(json!({
        "location": LatLon::new(lat, lon),
        "utm": ctx.utm(lat, lon).to_string(),
    }))
}

fn buffer_document<E: ProjectionEngine>(
    ctx: &SrContext<E>,
    lat: f64,
    lon: f64,
    distance: f64,
    units: Units,
) -> Result<Value> {
    let zone = SrGeometry::from_lat_lon(lat, lon)
        .buffer(ctx, distance, units)
        .context("Buffer failed")?;
    Ok(zone.export()?)
}

/// Transforme un objet exporté ou un tableau d'objets exportés
///
/// Les entrées nulles ou vides d'un tableau sont ignorées.
fn transform_document<E: ProjectionEngine>(
    ctx: &SrContext<E>,
    document: &Value,
    target: &Sr,
) -> Result<Value> {
    match document {
        Value::Array(items) => {
            let mut geometries = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match SrGeometry::load(item).context(format!("Invalid geometry at index {}", i))? {
                    Some(geometry) => geometries.push(geometry),
                    None => warn!(index = i, "Skipping empty entry"),
                }
            }

            let transformed = transform_all(ctx, &geometries, target)
                .context(format!("Failed to transform geometries to {}", target))?;
            info!(count = transformed.len(), sr = %target, "Geometries transformed");

            let exported = transformed
                .iter()
                .map(SrGeometry::export)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(exported))
        }
        _ => match SrGeometry::load(document).context("Invalid geometry")? {
            Some(geometry) => {
                let transformed = geometry
                    .transform(ctx, target, false)
                    .context(format!("Failed to transform geometry to {}", target))?;
                Ok(transformed.export()?)
            }
            None => Ok(Value::Null),
        },
    }
}

fn render_json(value: &Value, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

fn print_json(value: &Value, pretty: bool) -> Result<()> {
    let text = render_json(value, pretty)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapeup::{GeometryKind, LiteEngine, WGS_84};

    fn ctx() -> SrContext<LiteEngine> {
        SrContext::new(LiteEngine)
    }

    #[test]
    fn test_locate_document() {
        let ctx = ctx();
        let doc = locate_document(&ctx, 500000.0, 4982950.40, &Sr::epsg(32615)).unwrap();

        let lat = doc["location"]["lat"].as_f64().unwrap();
        let lon = doc["location"]["lon"].as_f64().unwrap();
        assert!((lat - 45.0).abs() < 1e-6, "lat={}", lat);
        assert!((lon - (-93.0)).abs() < 1e-6, "lon={}", lon);
        assert_eq!(doc["utm"], "epsg:32615");
    }

    #[test]
    fn test_locate_unknown_reference() {
        let ctx = ctx();
        assert!(locate_document(&ctx, 0.0, 0.0, &Sr::epsg(2154)).is_err());
    }

    #[test]
    fn test_buffer_document() {
        let ctx = ctx();
        let doc = buffer_document(&ctx, 45.55, -94.14, 1.0, Units::Kilometers).unwrap();
        assert_eq!(doc["type"], GeometryKind::Polygon.tag());
        assert_eq!(doc["baseGeometry"]["type"], "Polygon");
        assert_eq!(doc["sr"]["identifier"], 4326);
    }

    #[test]
    fn test_transform_single() {
        let ctx = ctx();
        let input = SrGeometry::from_lat_lon(45.0, -93.0).export().unwrap();
        let out = transform_document(&ctx, &input, &Sr::epsg(32615)).unwrap();

        let loaded = SrGeometry::load(&out).unwrap().unwrap();
        assert_eq!(loaded.srid(), 32615);
        assert!((loaded.x().unwrap() - 500000.0).abs() < 0.01);
    }

    #[test]
    fn test_transform_array_skips_empty_entries() {
        let ctx = ctx();
        let input = json!([
            SrGeometry::from_lat_lon(45.0, -93.0).export().unwrap(),
            null,
            {},
            SrGeometry::from_lat_lon(45.1, -93.1).export().unwrap(),
        ]);
        let out = transform_document(&ctx, &input, &Sr::epsg(32615)).unwrap();

        let items = out.as_array().unwrap();
        assert_eq!(items.len(), 2);
        for item in items {
            assert_eq!(item["sr"]["identifier"], 32615);
        }
    }

    #[test]
    fn test_transform_null_document() {
        let ctx = ctx();
        let out = transform_document(&ctx, &Value::Null, &WGS_84).unwrap();
        assert!(out.is_null());
    }

    #[test]
    fn test_transform_invalid_entry() {
        let ctx = ctx();
        let input = json!([{ "type": "shapeup::geometry::SrPoint" }]);
        let err = transform_document(&ctx, &input, &WGS_84).unwrap_err();
        assert!(err.to_string().contains("index 0"));
    }
}
