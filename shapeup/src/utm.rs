//! Zones UTM (Universal Transverse Mercator) WGS-84
//!
//! Les zones sont identifiées par les codes EPSG 326xx (nord) et 327xx (sud).

use crate::sr::{LatLon, Sr};

const NORTH_PREFIX: u32 = 32600;
const SOUTH_PREFIX: u32 = 32700;

/// Zone UTM: numéro de fuseau (1 à 60) et hémisphère
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtmZone {
    pub band: u8,
    pub south: bool,
}

impl UtmZone {
    /// Zone contenant un point géographique
    ///
    /// Le fuseau boucle modulo 60 (longitudes 180 et -180 donnent le fuseau 1),
    /// l'équateur appartient à l'hémisphère nord.
    pub fn containing(lat: f64, lon: f64) -> Self {
        let band = (((lon + 180.0) / 6.0).floor() as i64).rem_euclid(60) + 1;
        Self {
            band: band as u8,
            south: lat < 0.0,
        }
    }

    /// Retrouve la zone d'une référence EPSG 326xx / 327xx
    pub fn from_sr(sr: &Sr) -> Option<Self> {
        if !sr.authority.eq_ignore_ascii_case("epsg") {
            return None;
        }
        let (prefix, south) = match sr.identifier {
            32601..=32660 => (NORTH_PREFIX, false),
            32701..=32760 => (SOUTH_PREFIX, true),
            _ => return None,
        };
        Some(Self {
            band: (sr.identifier - prefix) as u8,
            south,
        })
    }

    /// Code EPSG de la zone (ex: fuseau 15 nord -> 32615)
    pub fn srid(self) -> u32 {
        let prefix = if self.south { SOUTH_PREFIX } else { NORTH_PREFIX };
        prefix + u32::from(self.band)
    }

    pub fn sr(self) -> Sr {
        Sr::epsg(self.srid())
    }

    /// Méridien central en degrés
    pub fn central_meridian(self) -> f64 {
        f64::from(self.band) * 6.0 - 183.0
    }
}

/// Référence spatiale de la zone UTM contenant (lat, lon)
pub fn utm_zone_for(lat: f64, lon: f64) -> Sr {
    UtmZone::containing(lat, lon).sr()
}

impl LatLon {
    /// Référence spatiale de la zone UTM contenant ce point
    pub fn utm(&self) -> Sr {
        utm_zone_for(self.lat, self.lon)
    }
}
