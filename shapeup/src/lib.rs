//! # shapeup
//!
//! Géométries `geo` associées à leur référence spatiale.
//!
//! ## Features
//!
//! - Références spatiales canoniques (`Sr`) mémorisées par (identifiant, autorité)
//! - Zone UTM WGS-84 d'un couple latitude / longitude
//! - Reprojection en Rust pur (WGS-84, Web Mercator, UTM), PROJ en option
//!   (feature `reproject`)
//! - Fonctions de transformation mémorisées par couple (source, cible)
//! - Zones tampons calculées en UTM, distances en mètres ou kilomètres
//! - Export JSON (GeoJSON + référence) et rechargement
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shapeup::{SrContext, SrGeometry, Units};
//!
//! let ctx = SrContext::global();
//! let point = SrGeometry::from_lat_lon(45.55367, -94.14243);
//!
//! let utm = point.as_utm(ctx)?;
//! println!("{} -> {}", point, utm.sr());
//!
//! let zone = point.buffer(ctx, 1.0, Units::Kilometers)?;
//! println!("{}", zone.export()?);
//! ```

pub mod context;
pub mod distance;
pub mod error;
pub mod geometry;
pub mod projection;
pub mod sr;
pub mod transform;
pub mod utm;

pub use context::SrContext;
pub use distance::{meters, meters_from, Units};
pub use error::SrError;
pub use geometry::{transform_all, ExportRecord, GeometryKind, SrGeometry};
pub use projection::{LiteEngine, ProjectionEngine, SmartEngine, TransformFn};
pub use sr::{Authority, LatLon, ReferenceCache, Sr, WEB_MERCATOR, WGS_84};
pub use transform::TransformCache;
pub use utm::{utm_zone_for, UtmZone};

#[cfg(feature = "reproject")]
pub use projection::ProjEngine;
