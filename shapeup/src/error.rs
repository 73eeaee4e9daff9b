//! Types d'erreurs pour le crate shapeup

use thiserror::Error;

/// Erreurs pouvant survenir lors de la manipulation de géométries référencées
#[derive(Debug, Error)]
pub enum SrError {
    /// Référence spatiale rejetée par le moteur de projection
    #[error("Invalid spatial reference {definition}: {reason}")]
    InvalidReference { definition: String, reason: String },

    /// Unité de distance absente de la table de conversion
    #[error("Unknown distance units: {0}")]
    UnknownUnits(String),

    /// Mapping d'export incomplet ou invalide
    #[error("Cannot load geometry: {0}")]
    Load(String),

    /// Le moteur de projection a échoué sur une coordonnée
    #[error("Transformation from {from} to {to} failed: {reason}")]
    Transform {
        from: String,
        to: String,
        reason: String,
    },

    /// Opération impossible sur une géométrie vide
    #[error("Empty geometry has no {0}")]
    EmptyGeometry(&'static str),

    /// Erreur de (dé)sérialisation JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Erreur d'encodage WKT / WKB
    #[error("Encoding error: {0}")]
    Encode(#[from] geozero::error::GeozeroError),
}

impl SrError {
    /// Crée une erreur de référence invalide avec contexte
    pub fn invalid_reference(definition: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            definition: definition.into(),
            reason: reason.into(),
        }
    }

    /// Crée une erreur de transformation avec contexte
    pub fn transform(
        from: impl Into<String>,
        to: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Transform {
            from: from.into(),
            to: to.into(),
            reason: reason.into(),
        }
    }

    /// Crée une erreur de chargement
    pub fn load(reason: impl Into<String>) -> Self {
        Self::Load(reason.into())
    }
}
