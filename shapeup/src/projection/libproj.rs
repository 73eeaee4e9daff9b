//! Reprojection via PROJ
//!
//! Ce module est disponible uniquement avec le feature `reproject`.

use std::sync::{Arc, Mutex, PoisonError};

use geo::Coord;
use proj::Proj;

use super::{ProjectionEngine, TransformFn};
use crate::{Sr, SrError};

/// Référence validée par PROJ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjCrs {
    definition: String,
}

impl ProjCrs {
    /// Définition au format "AUTHORITY:code"
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// Référence déjà validée par un autre moteur
    pub(crate) fn assume_valid(definition: String) -> Self {
        Self { definition }
    }
}

/// Moteur de projection PROJ
///
/// `Proj` est `Send` mais pas `Sync` : il ne peut pas être partagé par le
/// cache des handles. Le handle mémorisé est donc la définition validée
/// (`ProjCrs`), et `transformer` construit un pipeline PROJ par couple,
/// gardé par un `Mutex` et mémorisé par le cache des transformations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjEngine;

impl ProjectionEngine for ProjEngine {
    type Handle = ProjCrs;

    fn create(&self, sr: &Sr) -> Result<ProjCrs, SrError> {
        // PROJ attend l'autorité en majuscules. Le `Proj` construit ne sert
        // qu'à valider la définition
        let definition = format!("{}:{}", sr.authority.to_ascii_uppercase(), sr.identifier);
        Proj::new(&definition)
            .map_err(|e| SrError::invalid_reference(sr.definition(), e.to_string()))?;
        Ok(ProjCrs { definition })
    }

    fn transformer(&self, from: &ProjCrs, to: &ProjCrs) -> Result<TransformFn, SrError> {
        // Axes normalisés longitude / latitude, easting / northing
        let proj = Proj::new_known_crs(&from.definition, &to.definition, None).map_err(|e| {
            SrError::invalid_reference(
                format!("{} -> {}", from.definition, to.definition),
                e.to_string(),
            )
        })?;
        let proj = Mutex::new(proj);
        let (from, to) = (from.definition.clone(), to.definition.clone());

        Ok(Arc::new(move |c: Coord| {
            let proj = proj.lock().unwrap_or_else(PoisonError::into_inner);
            proj.convert((c.x, c.y))
                .map(|(x, y)| Coord { x, y })
                .map_err(|e| SrError::transform(&from, &to, e.to_string()))
        }))
    }
}
