//! Cache des fonctions de transformation
//!
//! Indexé par le couple ordonné (source, cible) : `(A, B)` et `(B, A)` sont
//! deux entrées distinctes. Aucune éviction.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::projection::{ProjectionCache, ProjectionEngine, TransformFn};
use crate::{Sr, SrError};

#[derive(Default)]
pub struct TransformCache {
    functions: RwLock<HashMap<(Sr, Sr), TransformFn>>,
}

impl TransformCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retourne la fonction `from` -> `to`, en la construisant si besoin
    ///
    /// Une construction ratée (référence invalide) ne laisse aucune entrée.
    pub fn transform_fn<E: ProjectionEngine>(
        &self,
        from: &Sr,
        to: &Sr,
        projections: &ProjectionCache<E>,
    ) -> Result<TransformFn, SrError> {
        let key = (from.clone(), to.clone());

        if let Some(f) = self
            .functions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(f));
        }

        let f = projections.transformer(from, to)?;
        debug!(from = %from, to = %to, "Transform function cached");

        let mut functions = self.functions.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(functions.entry(key).or_insert(f)))
    }

    /// Nombre de fonctions mémorisées
    pub fn len(&self) -> usize {
        self.functions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for TransformCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformCache")
            .field("functions", &self.len())
            .finish()
    }
}
