//! Contexte de références spatiales
//!
//! Regroupe les trois caches (références, handles de projection, fonctions
//! de transformation) autour d'un moteur de projection. Les opérations des
//! géométries reçoivent un contexte explicite; `SrContext::global()` fournit
//! une instance pour la durée du processus, à utiliser au point d'entrée.

use std::borrow::Cow;
use std::sync::OnceLock;

use crate::projection::{ProjectionCache, ProjectionEngine, SmartEngine, TransformFn};
use crate::sr::ReferenceCache;
use crate::transform::TransformCache;
use crate::utm::UtmZone;
use crate::{Sr, SrError};

#[derive(Debug)]
pub struct SrContext<E: ProjectionEngine = SmartEngine> {
    references: ReferenceCache,
    projections: ProjectionCache<E>,
    transforms: TransformCache,
}

impl SrContext<SmartEngine> {
    /// Contexte partagé par tout le processus
    pub fn global() -> &'static SrContext<SmartEngine> {
        static GLOBAL: OnceLock<SrContext<SmartEngine>> = OnceLock::new();
        GLOBAL.get_or_init(SrContext::default)
    }
}

impl Default for SrContext<SmartEngine> {
    fn default() -> Self {
        Self::new(SmartEngine::new())
    }
}

impl<E: ProjectionEngine> SrContext<E> {
    pub fn new(engine: E) -> Self {
        Self {
            references: ReferenceCache::new(),
            projections: ProjectionCache::new(engine),
            transforms: TransformCache::new(),
        }
    }

    /// Référence spatiale canonique pour (identifiant, autorité)
    pub fn sr(&self, identifier: u32, authority: impl Into<Cow<'static, str>>) -> Sr {
        self.references.get(identifier, authority)
    }

    /// Référence de la zone UTM contenant (lat, lon)
    pub fn utm(&self, lat: f64, lon: f64) -> Sr {
        let zone = UtmZone::containing(lat, lon);
        self.references.get(zone.srid(), "epsg")
    }

    /// Fonction de transformation mémorisée `from` -> `to`
    pub fn transform_fn(&self, from: &Sr, to: &Sr) -> Result<TransformFn, SrError> {
        self.transforms.transform_fn(from, to, &self.projections)
    }

    /// Vérifie que le moteur sait résoudre la référence
    pub fn check(&self, sr: &Sr) -> Result<(), SrError> {
        self.projections.resolve(sr).map(|_| ())
    }

    pub fn engine(&self) -> &E {
        self.projections.engine()
    }

    pub fn references(&self) -> &ReferenceCache {
        &self.references
    }

    pub fn projections(&self) -> &ProjectionCache<E> {
        &self.projections
    }

    pub fn transforms(&self) -> &TransformCache {
        &self.transforms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::LiteEngine;
    use crate::WGS_84;

    #[test]
    fn test_sr_identity() {
        let ctx = SrContext::new(LiteEngine);
        assert_eq!(ctx.sr(4326, "epsg"), ctx.sr(4326, "epsg"));
        assert_eq!(ctx.sr(4326, "epsg"), WGS_84);
        assert_eq!(ctx.references().len(), 1);
    }

    #[test]
    fn test_utm_goes_through_reference_cache() {
        let ctx = SrContext::new(LiteEngine);
        let a = ctx.utm(45.0, -94.0);
        let b = ctx.utm(45.5, -93.0);
        assert_eq!(a, Sr::epsg(32615));
        assert_eq!(a, b);
        assert_eq!(ctx.references().len(), 1);
    }

    #[test]
    fn test_check() {
        let ctx = SrContext::new(LiteEngine);
        assert!(ctx.check(&WGS_84).is_ok());
        assert!(ctx.check(&Sr::epsg(2154)).is_err());
        assert_eq!(ctx.projections().len(), 1);
    }

    #[test]
    fn test_global_is_shared() {
        let a = SrContext::global() as *const _;
        let b = SrContext::global() as *const _;
        assert_eq!(a, b);
    }
}
