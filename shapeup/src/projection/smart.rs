//! Reprojection intelligente : moteur léger en priorité, fallback sur PROJ
//!
//! Utilise automatiquement la meilleure option disponible.

#[cfg(feature = "reproject")]
use super::libproj::{ProjCrs, ProjEngine};
use super::lite::{LiteCrs, LiteEngine};
use super::{ProjectionEngine, TransformFn};
use crate::{Sr, SrError};

/// Handle résolu par le moteur intelligent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmartHandle {
    /// Système connu du moteur léger (pure Rust)
    Lite(LiteCrs),
    /// Système résolu par PROJ (si feature activée)
    #[cfg(feature = "reproject")]
    Proj(ProjCrs),
}

impl SmartHandle {
    /// Retourne une description du moteur utilisé
    pub fn description(&self) -> &'static str {
        match self {
            Self::Lite(_) => "lite (pure Rust)",
            #[cfg(feature = "reproject")]
            Self::Proj(_) => "proj (PROJ library)",
        }
    }

    #[cfg(feature = "reproject")]
    fn to_proj(&self) -> ProjCrs {
        match self {
            Self::Lite(crs) => ProjCrs::assume_valid(crs.definition()),
            Self::Proj(crs) => crs.clone(),
        }
    }
}

/// Moteur de projection intelligent
///
/// Essaie d'abord le moteur léger, puis PROJ si disponible.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmartEngine {
    lite: LiteEngine,
    #[cfg(feature = "reproject")]
    proj: ProjEngine,
}

impl SmartEngine {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(feature = "reproject")]
    fn fallback(&self, sr: &Sr) -> Result<SmartHandle, SrError> {
        self.proj.create(sr).map(SmartHandle::Proj)
    }

    #[cfg(not(feature = "reproject"))]
    fn fallback(&self, sr: &Sr) -> Result<SmartHandle, SrError> {
        Err(SrError::invalid_reference(
            sr.definition(),
            "not supported by the pure-Rust engine \
             (supported: EPSG:4326, EPSG:3857, EPSG:32601-32660, EPSG:32701-32760); \
             build with the `reproject` feature to use PROJ",
        ))
    }
}

impl ProjectionEngine for SmartEngine {
    type Handle = SmartHandle;

    fn create(&self, sr: &Sr) -> Result<SmartHandle, SrError> {
        if LiteEngine::is_supported(sr) {
            return self.lite.create(sr).map(SmartHandle::Lite);
        }
        self.fallback(sr)
    }

    fn transformer(&self, from: &SmartHandle, to: &SmartHandle) -> Result<TransformFn, SrError> {
        match (from, to) {
            (SmartHandle::Lite(from), SmartHandle::Lite(to)) => self.lite.transformer(from, to),
            #[cfg(feature = "reproject")]
            _ => self.proj.transformer(&from.to_proj(), &to.to_proj()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WGS_84;

    #[test]
    fn test_lite_first() {
        let engine = SmartEngine::new();
        let handle = engine.create(&WGS_84).unwrap();
        assert!(matches!(handle, SmartHandle::Lite(LiteCrs::Geographic)));
        assert_eq!(handle.description(), "lite (pure Rust)");
    }

    #[cfg(not(feature = "reproject"))]
    #[test]
    fn test_unsupported_without_proj() {
        let err = SmartEngine::new().create(&Sr::epsg(2154)).unwrap_err();
        assert!(matches!(err, SrError::InvalidReference { .. }));
    }

    #[cfg(feature = "reproject")]
    #[test]
    fn test_proj_fallback() {
        let engine = SmartEngine::new();
        let l93 = engine.create(&Sr::epsg(2154)).unwrap();
        assert!(matches!(l93, SmartHandle::Proj(_)));

        let wgs84 = engine.create(&WGS_84).unwrap();
        let f = engine.transformer(&l93, &wgs84).unwrap();
        let c = f(geo::Coord {
            x: 652381.0,
            y: 6862047.0,
        })
        .unwrap();
        assert!(c.x > 2.0 && c.x < 3.0, "lon={}", c.x);
    }
}
