// core/borewell_service.rs
use tracing::info;
use validator::Validate;

use crate::core::prediction::Predictor;
use crate::domain::borewell::{Borewell, BorewellOutcome, Coordinates, NewBorewell};
use crate::infrastructure::database::BorewellRepository;
use crate::infrastructure::error::{forbidden, AppResult};

/// Enregistrement des forages et de leurs résultats terrain
pub struct BorewellService {
    borewells: BorewellRepository,
    predictor: Predictor,
}

impl BorewellService {
    pub fn new(borewells: BorewellRepository, predictor: Predictor) -> Self {
        Self { borewells, predictor }
    }

    /// Calcule la prédiction pour un site et l'enregistre au nom de l'utilisateur
    pub async fn record_prediction(&self, owner_id: i64, site: &Coordinates) -> AppResult<Borewell> {
        site.validate()?;

        let prediction = self.predictor.predict(site.latitude, site.longitude)?;
        let borewell = self
            .borewells
            .create(&NewBorewell {
                owner_id: Some(owner_id),
                latitude: site.latitude,
                longitude: site.longitude,
                prediction,
                model_version: self.predictor.model_version().to_string(),
            })
            .await?;

        info!(
            borewell_id = borewell.id,
            owner_id,
            feasible = prediction.feasible,
            "📍 Forage enregistré"
        );
        Ok(borewell)
    }

    pub async fn list_for_owner(&self, owner_id: i64) -> AppResult<Vec<Borewell>> {
        self.borewells.list_by_owner(owner_id).await
    }

    /// Enregistre le résultat réel d'un forage.
    ///
    /// 404 si le forage n'existe pas, 403 s'il appartient à un autre utilisateur.
    pub async fn record_outcome(
        &self,
        user_id: i64,
        borewell_id: i64,
        outcome: &BorewellOutcome,
    ) -> AppResult<Borewell> {
        outcome.validate()?;

        let borewell = self.borewells.get_by_id(borewell_id).await?;
        if !borewell.can_be_modified_by(user_id) {
            return Err(forbidden("Ce forage appartient à un autre utilisateur"));
        }

        let updated = self.borewells.update_outcome(borewell_id, outcome).await?;
        info!(borewell_id, user_id, "📝 Résultat terrain enregistré");
        Ok(updated)
    }
}
