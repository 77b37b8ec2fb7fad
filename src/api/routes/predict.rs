use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    core::prediction::Predictor,
    domain::borewell::Coordinates,
    infrastructure::error::AppResult,
};

/// Réponse de l'endpoint de prédiction
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub latitude: f64,
    pub longitude: f64,
    pub predicted_feasible: bool,
    pub predicted_depth_m: f64,
    pub model_version: String,
}

/// Prédiction anonyme pour un site, sans enregistrement
#[post("/predict")]
pub async fn predict(
    site: web::Json<Coordinates>,
    predictor: web::Data<Predictor>,
) -> AppResult<HttpResponse> {
    site.validate()?;

    let result = predictor.predict(site.latitude, site.longitude)?;

    Ok(HttpResponse::Ok().json(PredictionResponse {
        latitude: site.latitude,
        longitude: site.longitude,
        predicted_feasible: result.feasible,
        predicted_depth_m: result.depth_m,
        model_version: predictor.model_version().to_string(),
    }))
}
