use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::registry::ModelRegistry;
use super::PredictionError;

/// Probabilité minimale (incluse) pour déclarer un site faisable
pub const FEASIBILITY_THRESHOLD: f64 = 0.5;

/// Estimation pour un site de forage
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub feasible: bool,
    pub depth_m: f64,
}

impl PredictionResult {
    /// Applique les règles métier aux sorties brutes des modèles.
    ///
    /// Un site non faisable n'a pas de profondeur estimée : `depth_m` vaut
    /// alors 0.0 quelle que soit la sortie du régresseur.
    pub fn from_model_outputs(feasible_probability: f64, raw_depth_m: f64) -> Self {
        let feasible = feasible_probability >= FEASIBILITY_THRESHOLD;
        let depth_m = if feasible { raw_depth_m } else { 0.0 };

        Self { feasible, depth_m }
    }
}

/// Applique les deux modèles du registre à des coordonnées
#[derive(Debug, Clone)]
pub struct Predictor {
    registry: Arc<ModelRegistry>,
}

impl Predictor {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn model_version(&self) -> &'static str {
        self.registry.model_version()
    }

    pub fn predict(&self, latitude: f64, longitude: f64) -> Result<PredictionResult, PredictionError> {
        let models = self.registry.models()?;
        let features = self.registry.feature_vector(latitude, longitude)?;

        let probability = models.classifier().predict_probability(&features);
        let raw_depth_m = models.regressor().predict(&features);
        let result = PredictionResult::from_model_outputs(probability, raw_depth_m);

        debug!(
            latitude,
            longitude,
            probability,
            raw_depth_m,
            feasible = result.feasible,
            depth_m = result.depth_m,
            "prédiction calculée"
        );

        Ok(result)
    }
}
