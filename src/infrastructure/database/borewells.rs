use sqlx::PgPool;

use crate::{
    domain::borewell::{Borewell, BorewellOutcome, NewBorewell},
    infrastructure::error::{not_found, AppResult},
};

const BOREWELL_COLUMNS: &str = "id, owner_id, latitude, longitude, predicted_feasible, \
     predicted_depth_m, model_version, actual_feasible, actual_depth_m, created_at";

/// Repository des forages enregistrés
#[derive(Clone)]
pub struct BorewellRepository {
    pool: PgPool,
}

impl BorewellRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Enregistre un forage avec la prédiction calculée
    pub async fn create(&self, borewell: &NewBorewell) -> AppResult<Borewell> {
        let created = sqlx::query_as::<_, Borewell>(&format!(
            "INSERT INTO borewells \
             (owner_id, latitude, longitude, predicted_feasible, predicted_depth_m, model_version) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            BOREWELL_COLUMNS
        ))
        .bind(borewell.owner_id)
        .bind(borewell.latitude)
        .bind(borewell.longitude)
        .bind(borewell.prediction.feasible)
        .bind(borewell.prediction.depth_m)
        .bind(&borewell.model_version)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Borewell> {
        sqlx::query_as::<_, Borewell>(&format!(
            "SELECT {} FROM borewells WHERE id = $1",
            BOREWELL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found("Forage"))
    }

    /// Forages d'un propriétaire, du plus récent au plus ancien
    pub async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Borewell>> {
        let borewells = sqlx::query_as::<_, Borewell>(&format!(
            "SELECT {} FROM borewells WHERE owner_id = $1 ORDER BY id DESC",
            BOREWELL_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(borewells)
    }

    /// Enregistre le résultat constaté sur le terrain
    pub async fn update_outcome(&self, id: i64, outcome: &BorewellOutcome) -> AppResult<Borewell> {
        sqlx::query_as::<_, Borewell>(&format!(
            "UPDATE borewells SET actual_feasible = $1, actual_depth_m = $2 \
             WHERE id = $3 RETURNING {}",
            BOREWELL_COLUMNS
        ))
        .bind(outcome.actual_feasible)
        .bind(outcome.actual_depth_m)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found("Forage"))
    }
}
