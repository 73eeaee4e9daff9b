//! Reprojection légère en Rust pur (sans dépendances externes)
//!
//! Références supportées :
//! - WGS84 (EPSG:4326), axes longitude / latitude en degrés
//! - Web Mercator (EPSG:3857)
//! - Zones UTM WGS84 nord (EPSG:32601 à 32660) et sud (EPSG:32701 à 32760)
//!
//! Toute transformation passe par les coordonnées géographiques WGS84.

mod ellipsoid;
mod mercator;
mod utm;

use std::sync::Arc;

use geo::Coord;

use super::{ProjectionEngine, TransformFn};
use crate::utm::UtmZone;
use crate::{Sr, SrError};

/// Point en coordonnées géographiques (radians)
#[derive(Debug, Clone, Copy)]
pub struct Geographic {
    /// Longitude en radians
    pub lon: f64,
    /// Latitude en radians
    pub lat: f64,
}

impl Geographic {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Convertit en degrés
    pub fn to_degrees(self) -> (f64, f64) {
        (self.lon.to_degrees(), self.lat.to_degrees())
    }

    /// Crée depuis des degrés
    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        Self {
            lon: lon_deg.to_radians(),
            lat: lat_deg.to_radians(),
        }
    }
}

/// Système de coordonnées connu du moteur léger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteCrs {
    /// WGS84 géographique (EPSG:4326)
    Geographic,
    /// Web Mercator (EPSG:3857)
    WebMercator,
    /// Zone UTM WGS84
    Utm(UtmZone),
}

impl LiteCrs {
    /// Retrouve le système d'une référence EPSG, si supporté
    pub fn from_sr(sr: &Sr) -> Option<Self> {
        if !sr.authority.eq_ignore_ascii_case("epsg") {
            return None;
        }
        match sr.identifier {
            4326 => Some(Self::Geographic),
            3857 => Some(Self::WebMercator),
            _ => UtmZone::from_sr(sr).map(Self::Utm),
        }
    }

    /// Code EPSG
    pub fn srid(self) -> u32 {
        match self {
            Self::Geographic => 4326,
            Self::WebMercator => 3857,
            Self::Utm(zone) => zone.srid(),
        }
    }

    /// Définition au format "EPSG:code"
    pub fn definition(self) -> String {
        format!("EPSG:{}", self.srid())
    }

    /// Coordonnées du système -> géographique
    fn unproject(self, x: f64, y: f64) -> Geographic {
        match self {
            Self::Geographic => Geographic::from_degrees(x, y),
            Self::WebMercator => mercator::web_mercator_to_geographic(x, y),
            Self::Utm(zone) => utm::utm_to_geographic(x, y, zone),
        }
    }

    /// Géographique -> coordonnées du système
    fn project(self, geo: Geographic) -> (f64, f64) {
        match self {
            Self::Geographic => {
                let (lon, lat) = geo.to_degrees();
                (wrap_longitude(lon), lat)
            }
            Self::WebMercator => mercator::geographic_to_web_mercator(geo),
            Self::Utm(zone) => utm::geographic_to_utm(geo, zone),
        }
    }
}

/// Ramène une longitude dans [-180, 180]
fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Moteur de projection léger
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteEngine;

impl LiteEngine {
    /// Vérifie si la référence est supportée
    pub fn is_supported(sr: &Sr) -> bool {
        LiteCrs::from_sr(sr).is_some()
    }

    /// Transforme un point (x, y) entre deux systèmes
    pub fn transform_point(from: LiteCrs, to: LiteCrs, x: f64, y: f64) -> (f64, f64) {
        if from == to {
            return (x, y);
        }
        to.project(from.unproject(x, y))
    }
}

impl ProjectionEngine for LiteEngine {
    type Handle = LiteCrs;

    fn create(&self, sr: &Sr) -> Result<LiteCrs, SrError> {
        LiteCrs::from_sr(sr).ok_or_else(|| {
            SrError::invalid_reference(
                sr.definition(),
                "not supported by the pure-Rust engine \
                 (supported: EPSG:4326, EPSG:3857, EPSG:32601-32660, EPSG:32701-32760)",
            )
        })
    }

    fn transformer(&self, from: &LiteCrs, to: &LiteCrs) -> Result<TransformFn, SrError> {
        let (from, to) = (*from, *to);
        Ok(Arc::new(move |c: Coord| {
            let (x, y) = LiteEngine::transform_point(from, to, c.x, c.y);
            Ok(Coord { x, y })
        }))
    }
}
