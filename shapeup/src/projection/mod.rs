//! Moteurs de projection et cache des handles
//!
//! Un moteur transforme une référence spatiale en handle, puis construit une
//! fonction de transformation entre deux handles. Les moteurs disponibles :
//! - `LiteEngine` : pure Rust (WGS-84, Web Mercator, zones UTM WGS-84)
//! - `ProjEngine` : PROJ (feature `reproject`)
//! - `SmartEngine` : `LiteEngine` en priorité, fallback sur PROJ

#[cfg(feature = "reproject")]
mod libproj;
pub mod lite;
mod smart;

#[cfg(feature = "reproject")]
pub use libproj::{ProjCrs, ProjEngine};
pub use lite::{LiteCrs, LiteEngine};
pub use smart::{SmartEngine, SmartHandle};

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use geo::Coord;
use tracing::debug;

use crate::{Sr, SrError};

/// Fonction de transformation d'une coordonnée entre deux références
pub type TransformFn = Arc<dyn Fn(Coord) -> Result<Coord, SrError> + Send + Sync>;

/// Moteur de projection externe
pub trait ProjectionEngine: Send + Sync {
    /// Handle résolu pour une référence spatiale
    type Handle: Send + Sync;

    /// Construit un handle depuis `sr.definition()`
    ///
    /// Échoue avec `SrError::InvalidReference` si le moteur ne reconnaît pas
    /// le couple identifiant / autorité.
    fn create(&self, sr: &Sr) -> Result<Self::Handle, SrError>;

    /// Construit la fonction de transformation `from` -> `to`
    fn transformer(&self, from: &Self::Handle, to: &Self::Handle)
        -> Result<TransformFn, SrError>;
}

/// Handles de projection mémorisés par référence spatiale
///
/// Un handle n'est inséré qu'après une construction réussie.
pub struct ProjectionCache<E: ProjectionEngine> {
    engine: E,
    handles: RwLock<HashMap<Sr, Arc<E::Handle>>>,
}

impl<E: ProjectionEngine> ProjectionCache<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            handles: RwLock::new(HashMap::new()),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Retourne le handle mémorisé pour `sr`, en le construisant si besoin
    pub(crate) fn resolve(&self, sr: &Sr) -> Result<Arc<E::Handle>, SrError> {
        if let Some(handle) = self
            .handles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(sr)
        {
            return Ok(Arc::clone(handle));
        }

        // Construction hors verrou : un appel concurrent peut construire un
        // doublon, seul le premier inséré est conservé
        let handle = Arc::new(self.engine.create(sr)?);
        debug!(sr = %sr, "Projection handle created");

        let mut handles = self.handles.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(handles.entry(sr.clone()).or_insert(handle)))
    }

    /// Construit la fonction de transformation entre deux références
    pub(crate) fn transformer(&self, from: &Sr, to: &Sr) -> Result<TransformFn, SrError> {
        let from_handle = self.resolve(from)?;
        let to_handle = self.resolve(to)?;
        self.engine.transformer(&from_handle, &to_handle)
    }

    /// Nombre de handles mémorisés
    pub fn len(&self) -> usize {
        self.handles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: ProjectionEngine> fmt::Debug for ProjectionCache<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectionCache")
            .field("handles", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WGS_84;

    #[test]
    fn test_resolve_is_memoized() {
        let cache = ProjectionCache::new(LiteEngine);
        let a = cache.resolve(&WGS_84).unwrap();
        let b = cache.resolve(&Sr::new(4326, "epsg")).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_resolution_is_not_cached() {
        let cache = ProjectionCache::new(LiteEngine);
        let err = cache.resolve(&Sr::epsg(2154)).unwrap_err();
        assert!(matches!(err, SrError::InvalidReference { .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_transformer() {
        let cache = ProjectionCache::new(LiteEngine);
        let f = cache.transformer(&WGS_84, &Sr::epsg(32615)).unwrap();
        let utm = f(Coord { x: -93.0, y: 45.0 }).unwrap();
        // Méridien central du fuseau 15 : easting = 500 000
        assert!((utm.x - 500_000.0).abs() < 0.01, "x={}", utm.x);
        assert!(utm.y > 4_900_000.0 && utm.y < 5_100_000.0, "y={}", utm.y);
        assert_eq!(cache.len(), 2);
    }
}
