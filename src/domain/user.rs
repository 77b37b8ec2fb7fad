use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Représente un utilisateur du système
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Identifiant de l'utilisateur
    pub id: i64,
    /// Email de l'utilisateur (unique) - utilisé pour la connexion
    pub email: String,
    /// Hash Argon2 du mot de passe (jamais exposé dans les APIs)
    #[serde(skip_serializing)]
    pub hashed_password: String,
    /// Nom complet, optionnel
    pub full_name: Option<String>,
    /// Statut du compte (actif/désactivé)
    pub is_active: bool,
    /// Date de création du compte
    pub created_at: DateTime<Utc>,
}

/// Données requises pour créer un nouvel utilisateur
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewUser {
    #[validate(email(message = "Format d'email invalide"))]
    pub email: String,
    #[validate(length(
        min = 8,
        max = 128,
        message = "Le mot de passe doit contenir entre 8 et 128 caractères"
    ))]
    pub password: String,
    pub full_name: Option<String>,
}

/// Données pour la connexion d'un utilisateur
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserLogin {
    #[validate(email(message = "Format d'email invalide"))]
    pub email: String,
    pub password: String,
}

/// Vue publique d'un utilisateur (exclut les données sensibles)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
        }
    }
}
