//! Distances linéaires et conversion en mètres

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SrError;

/// Unités de distance courantes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Meters,
    Kilometers,
}

impl Units {
    /// Nombre de mètres dans une unité
    pub const fn factor(self) -> f64 {
        match self {
            Self::Meters => 1.0,
            Self::Kilometers => 1000.0,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Meters => "meters",
            Self::Kilometers => "kilometers",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = SrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "meters" | "meter" | "m" => Ok(Self::Meters),
            "kilometers" | "kilometer" | "km" => Ok(Self::Kilometers),
            _ => Err(SrError::UnknownUnits(s.to_string())),
        }
    }
}

/// Convertit une distance en mètres
pub fn meters(n: f64, units: Units) -> f64 {
    n * units.factor()
}

/// Convertit une distance exprimée dans des unités nommées
pub fn meters_from(n: f64, units: &str) -> Result<f64, SrError> {
    Ok(meters(n, units.parse()?))
}
