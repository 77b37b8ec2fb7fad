use std::ops::Index;

/// Nom de colonne reconnu pour la latitude
pub const LATITUDE_COLUMN: &str = "latitude";
/// Nom de colonne reconnu pour la longitude
pub const LONGITUDE_COLUMN: &str = "longitude";

/// Valeur émise pour une colonne que l'on ne sait pas encore calculer
const UNMAPPED_FEATURE_VALUE: f64 = 0.0;

/// Vecteur de features, aligné position par position sur les colonnes du modèle
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Valeur d'une feature, `None` hors bornes
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }
}

impl Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Construit le vecteur de features dans l'ordre attendu par le modèle.
///
/// Seules la latitude et la longitude sont connues aujourd'hui : toute autre
/// colonne reçoit exactement 0.0, valeur utilisée à l'entraînement.
pub fn assemble_features(latitude: f64, longitude: f64, feature_columns: &[String]) -> FeatureVector {
    let values = feature_columns
        .iter()
        .map(|column| match column.as_str() {
            LATITUDE_COLUMN => latitude,
            LONGITUDE_COLUMN => longitude,
            _ => UNMAPPED_FEATURE_VALUE,
        })
        .collect();

    FeatureVector(values)
}
