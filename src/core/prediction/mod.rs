//! # Prediction
//!
//! Ce module transforme des coordonnées géographiques en estimation
//! de faisabilité et de profondeur pour un forage :
//! - `artifacts.rs`: Chargement et évaluation des forêts aléatoires exportées
//! - `registry.rs`: Registre des deux modèles, chargé une fois au démarrage
//! - `features.rs`: Assemblage du vecteur de features dans l'ordre du modèle
//! - `predictor.rs`: Seuil de faisabilité et normalisation de la profondeur
//!
//! ## Cycle de vie
//! Le registre est construit explicitement dans `main.rs`, chargé avant
//! l'ouverture du serveur HTTP, puis partagé en lecture seule entre les workers.

pub mod artifacts;
pub mod features;
pub mod predictor;
pub mod registry;

pub use artifacts::{Classifier, ForestClassifier, ForestRegressor, ModelBundle, Regressor};
pub use features::{assemble_features, FeatureVector, LATITUDE_COLUMN, LONGITUDE_COLUMN};
pub use predictor::{PredictionResult, Predictor, FEASIBILITY_THRESHOLD};
pub use registry::{LoadedModels, ModelRegistry, DEPTH_ARTIFACT, FEASIBILITY_ARTIFACT, MODEL_VERSION};

use std::path::PathBuf;

use crate::infrastructure::error::AppError;

/// Erreurs de la couche de prédiction
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    /// Artefact absent, illisible ou mal formé (fatal au démarrage)
    #[error("Impossible de charger l'artefact {}: {reason}", path.display())]
    ArtifactLoad { path: PathBuf, reason: String },
    /// Inférence demandée avant la fin de `ModelRegistry::load`
    #[error("Les modèles ne sont pas chargés")]
    ModelsNotLoaded,
}

impl PredictionError {
    pub(crate) fn artifact(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        PredictionError::ArtifactLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<PredictionError> for AppError {
    fn from(error: PredictionError) -> Self {
        AppError::Prediction(error)
    }
}
