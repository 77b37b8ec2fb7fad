//! # Artefacts de modèles
//!
//! Les modèles sont entraînés hors de ce service puis exportés en JSON :
//!
//! ```json
//! {
//!   "model": {
//!     "kind": "random_forest_classifier",
//!     "positive_class": 1,
//!     "trees": [{ "nodes": [
//!       { "feature": 0, "threshold": 20.5, "left": 1, "right": 2 },
//!       { "value": [30.0, 10.0] },
//!       { "value": [5.0, 55.0] }
//!     ]}]
//!   },
//!   "features": ["latitude", "longitude"]
//! }
//! ```
//!
//! Un noeud de split envoie à gauche quand `x[feature] <= threshold`.
//! Les enfants ont toujours un indice supérieur à leur parent, ce qui
//! garantit la terminaison du parcours.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::features::FeatureVector;
use super::PredictionError;

/// Modèle capable de donner la probabilité de la classe positive
pub trait Classifier: fmt::Debug + Send + Sync {
    fn predict_probability(&self, features: &FeatureVector) -> f64;
}

/// Modèle de régression à une sortie
pub trait Regressor: fmt::Debug + Send + Sync {
    fn predict(&self, features: &FeatureVector) -> f64;
}

/// Un modèle entraîné et l'ordre des colonnes qu'il attend
#[derive(Debug)]
pub struct ModelBundle<M> {
    pub model: M,
    pub feature_columns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn check(&self, n_features: usize, min_leaf_len: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("arbre sans noeud".to_string());
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split { feature, threshold, left, right } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "noeud {}: feature {} hors des {} colonnes déclarées",
                            index, feature, n_features
                        ));
                    }
                    if threshold.is_nan() {
                        return Err(format!("noeud {}: seuil NaN", index));
                    }
                    for child in [*left, *right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(format!("noeud {}: enfant {} invalide", index, child));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() < min_leaf_len {
                        return Err(format!(
                            "noeud {}: feuille de {} valeur(s), {} attendue(s)",
                            index,
                            value.len(),
                            min_leaf_len
                        ));
                    }
                }
            }
        }

        Ok(())
    }

    /// Feuille atteinte pour `features`.
    ///
    /// `features` doit avoir la largeur vérifiée par `check` : un indice hors
    /// bornes est une violation d'invariant, pas une feature absente.
    fn leaf(&self, features: &FeatureVector) -> &[f64] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Split { feature, threshold, left, right } => {
                    let x = features[*feature];
                    index = if x <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }
}

fn default_positive_class() -> usize {
    1
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ModelArtifact {
    RandomForestClassifier {
        trees: Vec<DecisionTree>,
        #[serde(default = "default_positive_class")]
        positive_class: usize,
    },
    RandomForestRegressor {
        trees: Vec<DecisionTree>,
    },
}

impl ModelArtifact {
    fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::RandomForestClassifier { .. } => "random_forest_classifier",
            ModelArtifact::RandomForestRegressor { .. } => "random_forest_regressor",
        }
    }
}

/// Forme attendue d'un fichier d'artefact : `{model, features}`
#[derive(Debug, Deserialize)]
struct ArtifactFile {
    model: ModelArtifact,
    features: Vec<String>,
}

/// Forêt aléatoire de classification
#[derive(Debug, Clone)]
pub struct ForestClassifier {
    trees: Vec<DecisionTree>,
    positive_class: usize,
}

impl Classifier for ForestClassifier {
    /// Moyenne, sur les arbres, de la proportion de la classe positive dans la feuille atteinte
    fn predict_probability(&self, features: &FeatureVector) -> f64 {
        let total: f64 = self
            .trees
            .iter()
            .map(|tree| {
                let leaf = tree.leaf(features);
                let weight: f64 = leaf.iter().sum();
                if weight > 0.0 {
                    leaf[self.positive_class] / weight
                } else {
                    0.0
                }
            })
            .sum();

        total / self.trees.len() as f64
    }
}

/// Forêt aléatoire de régression
#[derive(Debug, Clone)]
pub struct ForestRegressor {
    trees: Vec<DecisionTree>,
}

impl Regressor for ForestRegressor {
    fn predict(&self, features: &FeatureVector) -> f64 {
        let total: f64 = self.trees.iter().map(|tree| tree.leaf(features)[0]).sum();
        total / self.trees.len() as f64
    }
}

fn check_forest(trees: &[DecisionTree], n_features: usize, min_leaf_len: usize) -> Result<(), String> {
    if trees.is_empty() {
        return Err("forêt sans arbre".to_string());
    }
    for (index, tree) in trees.iter().enumerate() {
        tree.check(n_features, min_leaf_len)
            .map_err(|e| format!("arbre {}: {}", index, e))?;
    }
    Ok(())
}

fn read_artifact(path: &Path) -> Result<ArtifactFile, PredictionError> {
    let raw = fs::read_to_string(path).map_err(|e| PredictionError::artifact(path, e))?;
    parse_artifact(path, &raw)
}

fn parse_artifact(path: &Path, raw: &str) -> Result<ArtifactFile, PredictionError> {
    serde_json::from_str(raw)
        .map_err(|e| PredictionError::artifact(path, format!("bundle invalide: {}", e)))
}

fn classifier_from_artifact(
    path: &Path,
    artifact: ArtifactFile,
) -> Result<ModelBundle<ForestClassifier>, PredictionError> {
    let ArtifactFile { model, features } = artifact;
    match model {
        ModelArtifact::RandomForestClassifier { trees, positive_class } => {
            check_forest(&trees, features.len(), positive_class.saturating_add(1))
                .map_err(|reason| PredictionError::artifact(path, reason))?;
            debug!("🌲 Classifieur chargé: {} arbres, {} colonnes", trees.len(), features.len());
            Ok(ModelBundle {
                model: ForestClassifier { trees, positive_class },
                feature_columns: features,
            })
        }
        other => Err(PredictionError::artifact(
            path,
            format!("type de modèle {} (attendu: random_forest_classifier)", other.kind()),
        )),
    }
}

fn regressor_from_artifact(
    path: &Path,
    artifact: ArtifactFile,
) -> Result<ModelBundle<ForestRegressor>, PredictionError> {
    let ArtifactFile { model, features } = artifact;
    match model {
        ModelArtifact::RandomForestRegressor { trees } => {
            check_forest(&trees, features.len(), 1)
                .map_err(|reason| PredictionError::artifact(path, reason))?;
            debug!("🌲 Régresseur chargé: {} arbres, {} colonnes", trees.len(), features.len());
            Ok(ModelBundle {
                model: ForestRegressor { trees },
                feature_columns: features,
            })
        }
        other => Err(PredictionError::artifact(
            path,
            format!("type de modèle {} (attendu: random_forest_regressor)", other.kind()),
        )),
    }
}

/// Charge le classifieur de faisabilité depuis un fichier JSON
pub fn load_classifier(path: &Path) -> Result<ModelBundle<ForestClassifier>, PredictionError> {
    let artifact = read_artifact(path)?;
    classifier_from_artifact(path, artifact)
}

/// Charge le régresseur de profondeur depuis un fichier JSON
pub fn load_regressor(path: &Path) -> Result<ModelBundle<ForestRegressor>, PredictionError> {
    let artifact = read_artifact(path)?;
    regressor_from_artifact(path, artifact)
}
