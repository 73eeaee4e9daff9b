//! Références spatiales (SR)
//!
//! Une référence spatiale identifie un système de coordonnées par un code
//! numérique et une autorité (ex: `epsg:4326`).

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::{OnceLock, PoisonError, RwLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::SrError;

/// Autorités de références spatiales connues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Authority {
    /// European Petroleum Survey Group
    Epsg,
}

impl Authority {
    /// Nom de l'autorité tel qu'il apparaît dans un `Sr`
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Epsg => "epsg",
        }
    }
}

impl From<Authority> for Cow<'static, str> {
    fn from(authority: Authority) -> Self {
        Cow::Borrowed(authority.as_str())
    }
}

/// Référence spatiale: identifiant + autorité
///
/// Valeur immuable, comparée et hashée champ par champ. La validité du couple
/// n'est vérifiée qu'à la résolution par un moteur de projection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sr {
    /// Identifiant numérique (SRID)
    pub identifier: u32,
    /// Autorité (ex: "epsg")
    pub authority: Cow<'static, str>,
}

/// WGS-84 (EPSG:4326)
pub const WGS_84: Sr = Sr::epsg(4326);

/// Web Mercator (EPSG:3857)
pub const WEB_MERCATOR: Sr = Sr::epsg(3857);

impl Sr {
    pub fn new(identifier: u32, authority: impl Into<Cow<'static, str>>) -> Self {
        Self {
            identifier,
            authority: authority.into(),
        }
    }

    /// Référence dans l'autorité EPSG
    pub const fn epsg(identifier: u32) -> Self {
        Self {
            identifier,
            authority: Cow::Borrowed("epsg"),
        }
    }

    /// Retourne le SRID
    pub fn srid(&self) -> u32 {
        self.identifier
    }

    /// Définition "{authority}:{identifier}" transmise au moteur de projection
    pub fn definition(&self) -> String {
        format!("{}:{}", self.authority, self.identifier)
    }

    pub fn is_wgs84(&self) -> bool {
        *self == WGS_84
    }
}

impl fmt::Display for Sr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.authority, self.identifier)
    }
}

fn sr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(?:(?P<authority>[A-Za-z][A-Za-z0-9_-]*)\s*:\s*)?(?P<identifier>\d+)\s*$")
            .expect("static regex")
    })
}

/// Parse "4326", "epsg:4326" ou "EPSG:4326"
///
/// L'autorité est mise en minuscules; un code seul est un code EPSG.
impl FromStr for Sr {
    type Err = SrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = sr_pattern()
            .captures(s)
            .ok_or_else(|| SrError::invalid_reference(s, "expected [authority:]identifier"))?;

        let identifier: u32 = caps["identifier"]
            .parse()
            .map_err(|e| SrError::invalid_reference(s, format!("{e}")))?;

        Ok(match caps.name("authority") {
            Some(authority) if !authority.as_str().eq_ignore_ascii_case("epsg") => {
                Sr::new(identifier, authority.as_str().to_ascii_lowercase())
            }
            _ => Sr::epsg(identifier),
        })
    }
}

/// Couple latitude / longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Cache des valeurs `Sr` canoniques, indexé par (identifiant, autorité)
///
/// Ne grossit que par insertion; aucune éviction.
#[derive(Debug, Default)]
pub struct ReferenceCache {
    entries: RwLock<HashSet<Sr>>,
}

impl ReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retourne la valeur canonique pour le couple, en l'insérant si besoin
    pub fn get(&self, identifier: u32, authority: impl Into<Cow<'static, str>>) -> Sr {
        let candidate = Sr::new(identifier, authority);

        if let Some(sr) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&candidate)
        {
            return sr.clone();
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(sr) = entries.get(&candidate) {
            return sr.clone();
        }
        entries.insert(candidate.clone());
        candidate
    }

    /// Nombre de références connues
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_by_value() {
        assert_eq!(Sr::new(4326, "epsg"), WGS_84);
        assert_eq!(Sr::new(4326, Authority::Epsg), WGS_84);
        assert_ne!(Sr::new(4326, "esri"), WGS_84);
        assert_ne!(Sr::epsg(3857), WGS_84);
    }

    #[test]
    fn test_definition() {
        assert_eq!(WGS_84.definition(), "epsg:4326");
        assert_eq!(Sr::new(102003, "esri").to_string(), "esri:102003");
    }

    #[test]
    fn test_parse() {
        assert_eq!("4326".parse::<Sr>().unwrap(), WGS_84);
        assert_eq!("epsg:4326".parse::<Sr>().unwrap(), WGS_84);
        assert_eq!("EPSG:32615".parse::<Sr>().unwrap(), Sr::epsg(32615));
        assert_eq!(
            "ESRI:102003".parse::<Sr>().unwrap(),
            Sr::new(102003, "esri")
        );
        assert!("".parse::<Sr>().is_err());
        assert!("epsg:".parse::<Sr>().is_err());
        assert!("wgs84".parse::<Sr>().is_err());
    }

    #[test]
    fn test_reference_cache_identity() {
        let cache = ReferenceCache::new();
        let a = cache.get(4326, "epsg");
        let b = cache.get(4326, Authority::Epsg);
        assert_eq!(a, b);
        assert_eq!(cache.len(), 1);

        // N'importe quel couple est accepté, même inconnu
        let unknown = cache.get(999_999, "nobody");
        assert_eq!(unknown.identifier, 999_999);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&WGS_84).unwrap();
        assert_eq!(json, r#"{"identifier":4326,"authority":"epsg"}"#);
        let sr: Sr = serde_json::from_str(&json).unwrap();
        assert_eq!(sr, WGS_84);
    }
}
