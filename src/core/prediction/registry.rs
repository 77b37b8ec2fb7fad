use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::{info, warn};

use super::artifacts::{self, Classifier, ModelBundle, Regressor};
use super::features::{assemble_features, FeatureVector};
use super::PredictionError;

/// Version publiée avec chaque prédiction
pub const MODEL_VERSION: &str = "v1.0-rf";

/// Fichier du classifieur de faisabilité dans le répertoire des modèles
pub const FEASIBILITY_ARTIFACT: &str = "feasibility_rf.json";
/// Fichier du régresseur de profondeur dans le répertoire des modèles
pub const DEPTH_ARTIFACT: &str = "depth_rf.json";

/// Les deux modèles chargés, immuables une fois construits
#[derive(Debug)]
pub struct LoadedModels {
    feasibility: ModelBundle<Box<dyn Classifier>>,
    depth: ModelBundle<Box<dyn Regressor>>,
}

impl LoadedModels {
    pub fn new(
        feasibility: ModelBundle<Box<dyn Classifier>>,
        depth: ModelBundle<Box<dyn Regressor>>,
    ) -> Self {
        if feasibility.feature_columns != depth.feature_columns {
            warn!(
                "⚠️  Noms de colonnes différents entre modèles: faisabilité={:?}, profondeur={:?} (celles de la faisabilité font foi)",
                feasibility.feature_columns, depth.feature_columns
            );
        }
        Self { feasibility, depth }
    }

    /// Colonnes de référence (celles du classifieur de faisabilité)
    pub fn feature_columns(&self) -> &[String] {
        &self.feasibility.feature_columns
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.feasibility.model.as_ref()
    }

    pub fn regressor(&self) -> &dyn Regressor {
        self.depth.model.as_ref()
    }
}

/// Registre des modèles de prédiction.
///
/// Construit explicitement puis chargé une seule fois au démarrage. La
/// publication passe par un `OnceLock` : les lecteurs ne voient jamais un
/// état partiellement initialisé et les lectures ne prennent aucun verrou.
#[derive(Debug)]
pub struct ModelRegistry {
    models_dir: PathBuf,
    models: OnceLock<LoadedModels>,
}

impl ModelRegistry {
    /// Crée un registre vide pointant vers le répertoire des artefacts
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
            models: OnceLock::new(),
        }
    }

    /// Crée un registre déjà chargé avec des modèles construits ailleurs
    pub fn with_models(models: LoadedModels) -> Self {
        let registry = Self::new(PathBuf::new());
        let _ = registry.models.set(models);
        registry
    }

    /// Charge les deux artefacts depuis le disque.
    ///
    /// À appeler pendant le démarrage, avant d'accepter du trafic. Toute
    /// erreur est fatale : il n'y a pas de service partiel.
    pub fn load(&self) -> Result<(), PredictionError> {
        if self.is_loaded() {
            warn!("⚠️  Modèles déjà chargés, rechargement ignoré");
            return Ok(());
        }

        let feasibility_path = self.models_dir.join(FEASIBILITY_ARTIFACT);
        let depth_path = self.models_dir.join(DEPTH_ARTIFACT);

        info!("📦 Chargement des modèles depuis {}", self.models_dir.display());

        let feasibility = artifacts::load_classifier(&feasibility_path)?;
        let depth = artifacts::load_regressor(&depth_path)?;

        // le régresseur lit le vecteur construit sur les colonnes de faisabilité
        if depth.feature_columns.len() != feasibility.feature_columns.len() {
            return Err(PredictionError::artifact(
                &depth_path,
                format!(
                    "{} colonnes déclarées, le classifieur de faisabilité en attend {}",
                    depth.feature_columns.len(),
                    feasibility.feature_columns.len()
                ),
            ));
        }

        let models = LoadedModels::new(
            ModelBundle {
                model: Box::new(feasibility.model) as Box<dyn Classifier>,
                feature_columns: feasibility.feature_columns,
            },
            ModelBundle {
                model: Box::new(depth.model) as Box<dyn Regressor>,
                feature_columns: depth.feature_columns,
            },
        );

        let columns = models.feature_columns().to_vec();
        if self.models.set(models).is_err() {
            warn!("⚠️  Modèles chargés en parallèle, résultat ignoré");
            return Ok(());
        }

        info!("✅ Modèles {} chargés (features: {:?})", MODEL_VERSION, columns);
        Ok(())
    }

    /// Indique si les deux modèles sont en mémoire
    pub fn is_loaded(&self) -> bool {
        self.models.get().is_some()
    }

    pub fn models(&self) -> Result<&LoadedModels, PredictionError> {
        self.models.get().ok_or(PredictionError::ModelsNotLoaded)
    }

    pub fn feature_columns(&self) -> Result<&[String], PredictionError> {
        Ok(self.models()?.feature_columns())
    }

    /// Vecteur de features pour des coordonnées, dans l'ordre des modèles chargés
    pub fn feature_vector(&self, latitude: f64, longitude: f64) -> Result<FeatureVector, PredictionError> {
        let columns = self.feature_columns()?;
        Ok(assemble_features(latitude, longitude, columns))
    }

    pub fn model_version(&self) -> &'static str {
        MODEL_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::path::Path;

    fn write_artifacts(dir: &Path, classifier_features: &[&str], regressor_features: &[&str]) {
        let feasibility = json!({
            "model": {
                "kind": "random_forest_classifier",
                "trees": [{ "nodes": [
                    { "feature": 0, "threshold": 20.0, "left": 1, "right": 2 },
                    { "value": [8.0, 2.0] },
                    { "value": [1.0, 9.0] }
                ]}]
            },
            "features": classifier_features
        });
        let depth = json!({
            "model": {
                "kind": "random_forest_regressor",
                "trees": [{ "nodes": [ { "value": [142.0] } ] }]
            },
            "features": regressor_features
        });
        fs::write(dir.join(FEASIBILITY_ARTIFACT), feasibility.to_string()).unwrap();
        fs::write(dir.join(DEPTH_ARTIFACT), depth.to_string()).unwrap();
    }

    #[test]
    fn test_not_loaded_before_load() {
        let registry = ModelRegistry::new("models");
        assert!(!registry.is_loaded());
        assert!(matches!(registry.models(), Err(PredictionError::ModelsNotLoaded)));
        assert!(matches!(
            registry.feature_vector(10.0, 20.0),
            Err(PredictionError::ModelsNotLoaded)
        ));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), &["latitude", "longitude"], &["latitude", "longitude"]);

        let registry = ModelRegistry::new(dir.path());
        registry.load().unwrap();

        assert!(registry.is_loaded());
        assert_eq!(registry.feature_columns().unwrap(), &["latitude", "longitude"]);
        assert_eq!(
            registry.feature_vector(21.5, 76.0).unwrap().as_slice(),
            &[21.5, 76.0]
        );
        assert_eq!(registry.model_version(), "v1.0-rf");
    }

    #[test]
    fn test_second_load_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), &["latitude", "longitude"], &["latitude", "longitude"]);

        let registry = ModelRegistry::new(dir.path());
        registry.load().unwrap();

        // même si les fichiers disparaissent, le registre reste chargé
        fs::remove_file(dir.path().join(DEPTH_ARTIFACT)).unwrap();
        registry.load().unwrap();
        assert!(registry.is_loaded());
    }

    #[test]
    fn test_feasibility_columns_win_on_renamed_columns() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(
            dir.path(),
            &["latitude", "longitude", "rainfall_mm"],
            &["latitude", "longitude", "soil_type"],
        );

        let registry = ModelRegistry::new(dir.path());
        registry.load().unwrap();
        assert_eq!(
            registry.feature_vector(10.0, 20.0).unwrap().as_slice(),
            &[10.0, 20.0, 0.0]
        );
    }

    #[test]
    fn test_depth_column_count_mismatch_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), &["latitude", "longitude"], &["latitude", "longitude"]);
        let depth = json!({
            "model": {
                "kind": "random_forest_regressor",
                "trees": [{ "nodes": [
                    { "feature": 2, "threshold": 15.0, "left": 1, "right": 2 },
                    { "value": [40.0] },
                    { "value": [200.0] }
                ]}]
            },
            "features": ["rainfall_mm", "longitude", "latitude"]
        });
        fs::write(dir.path().join(DEPTH_ARTIFACT), depth.to_string()).unwrap();

        let registry = ModelRegistry::new(dir.path());
        match registry.load() {
            Err(PredictionError::ArtifactLoad { path, reason }) => {
                assert_eq!(path, dir.path().join(DEPTH_ARTIFACT));
                assert!(reason.contains("3 colonnes"));
            }
            other => panic!("résultat inattendu: {:?}", other),
        }
        assert!(!registry.is_loaded());
    }

    #[test]
    fn test_missing_depth_artifact_fails_and_stays_unloaded() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), &["latitude", "longitude"], &["latitude", "longitude"]);
        fs::remove_file(dir.path().join(DEPTH_ARTIFACT)).unwrap();

        let registry = ModelRegistry::new(dir.path());
        let err = registry.load().unwrap_err();

        match err {
            PredictionError::ArtifactLoad { path, .. } => {
                assert_eq!(path, dir.path().join(DEPTH_ARTIFACT));
            }
            other => panic!("erreur inattendue: {:?}", other),
        }
        assert!(!registry.is_loaded());
    }

    #[test]
    fn test_bundle_without_model_key_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), &["latitude", "longitude"], &["latitude", "longitude"]);
        fs::write(
            dir.path().join(FEASIBILITY_ARTIFACT),
            json!({ "features": ["latitude", "longitude"] }).to_string(),
        )
        .unwrap();

        let registry = ModelRegistry::new(dir.path());
        assert!(matches!(registry.load(), Err(PredictionError::ArtifactLoad { .. })));
        assert!(!registry.is_loaded());
    }
}
