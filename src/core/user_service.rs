// core/user_service.rs
use serde::Serialize;
use tracing::info;
use validator::Validate;

use crate::domain::user::{NewUser, User, UserLogin};
use crate::infrastructure::database::UserRepository;
use crate::infrastructure::error::{unauthorized, AppError, AppResult};
use crate::utils::security::{generate_access_token, verify_access_token, JwtConfig};

/// Token renvoyé après une connexion réussie
#[derive(Debug, Clone, Serialize)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
    /// Durée de validité en secondes
    pub expires_in: i64,
}

pub struct UserService {
    users: UserRepository,
    jwt: JwtConfig,
}

impl UserService {
    pub fn new(users: UserRepository, jwt: JwtConfig) -> Self {
        Self { users, jwt }
    }

    /// Inscription d'un nouvel utilisateur
    pub async fn register(&self, new_user: &NewUser) -> AppResult<User> {
        let user = self.users.create(new_user).await?;
        info!(user_id = user.id, "👤 Nouvel utilisateur inscrit");
        Ok(user)
    }

    /// Authentification email/mot de passe, puis émission d'un token d'accès
    pub async fn login(&self, credentials: &UserLogin) -> AppResult<AuthToken> {
        credentials.validate()?;

        let user = self
            .users
            .authenticate(&credentials.email, &credentials.password)
            .await?;

        let access_token = generate_access_token(user.id, &self.jwt)?;
        info!(user_id = user.id, "🔑 Connexion réussie");

        Ok(AuthToken {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: self.jwt.access_token_expiry.num_seconds(),
        })
    }

    /// Résout l'utilisateur porté par un token d'accès.
    ///
    /// Token invalide ou expiré, utilisateur inconnu ou désactivé : 401.
    pub async fn current_user(&self, token: &str) -> AppResult<User> {
        let claims = verify_access_token(token, &self.jwt)?;
        let user_id = claims.user_id()?;

        let user = match self.users.get_by_id(user_id).await {
            Ok(user) => user,
            Err(AppError::NotFound(_)) => return Err(unauthorized("Utilisateur inconnu")),
            Err(e) => return Err(e),
        };

        if !user.is_active {
            return Err(unauthorized("Compte désactivé"));
        }

        Ok(user)
    }
}
