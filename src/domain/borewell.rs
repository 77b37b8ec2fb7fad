use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::core::prediction::PredictionResult;

/// Un site de forage enregistré, avec la prédiction obtenue et le résultat réel éventuel
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Borewell {
    pub id: i64,
    /// Propriétaire (NULL pour les enregistrements sans propriétaire)
    pub owner_id: Option<i64>,
    pub latitude: f64,
    pub longitude: f64,
    pub predicted_feasible: bool,
    pub predicted_depth_m: f64,
    /// Version des modèles ayant produit la prédiction
    pub model_version: String,
    pub actual_feasible: Option<bool>,
    pub actual_depth_m: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Données requises pour insérer un forage
#[derive(Debug, Clone)]
pub struct NewBorewell {
    pub owner_id: Option<i64>,
    pub latitude: f64,
    pub longitude: f64,
    pub prediction: PredictionResult,
    pub model_version: String,
}

/// Coordonnées d'un site
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct Coordinates {
    #[validate(custom = "validate_finite")]
    pub latitude: f64,
    #[validate(custom = "validate_finite")]
    pub longitude: f64,
}

/// Résultat constaté sur le terrain
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BorewellOutcome {
    pub actual_feasible: bool,
    #[validate(custom = "validate_finite")]
    pub actual_depth_m: f64,
}

/// Vue API d'un forage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorewellView {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub predicted_feasible: bool,
    pub predicted_depth_m: f64,
    pub model_version: String,
    pub actual_feasible: Option<bool>,
    pub actual_depth_m: Option<f64>,
}

impl From<Borewell> for BorewellView {
    fn from(borewell: Borewell) -> Self {
        Self {
            id: borewell.id,
            latitude: borewell.latitude,
            longitude: borewell.longitude,
            predicted_feasible: borewell.predicted_feasible,
            predicted_depth_m: borewell.predicted_depth_m,
            model_version: borewell.model_version,
            actual_feasible: borewell.actual_feasible,
            actual_depth_m: borewell.actual_depth_m,
        }
    }
}

impl Borewell {
    /// Un forage sans propriétaire peut être modifié par tout utilisateur authentifié
    pub fn can_be_modified_by(&self, user_id: i64) -> bool {
        match self.owner_id {
            Some(owner_id) => owner_id == user_id,
            None => true,
        }
    }
}

fn validate_finite(value: f64) -> Result<(), validator::ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("finite");
        err.message = Some("La valeur doit être un nombre fini".into());
        Err(err)
    }
}
