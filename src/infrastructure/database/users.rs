use sqlx::{Error as SqlxError, PgPool};
use validator::Validate;

use crate::{
    domain::user::{NewUser, User},
    infrastructure::error::{AppError, AppResult},
    utils::security::{hash_password, verify_password},
};

const USER_COLUMNS: &str = "id, email, hashed_password, full_name, is_active, created_at";

/// Repository pour les opérations sur les utilisateurs
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Utilisateur non trouvé")]
    NotFound,
    #[error("Email déjà utilisé")]
    EmailExists,
    #[error("Authentification échouée")]
    AuthenticationFailed,
    #[error("Validation échouée: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
    #[error("Erreur de base de données: {0}")]
    DatabaseError(#[from] SqlxError),
}

impl From<UserError> for AppError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::NotFound => AppError::NotFound("Utilisateur".to_string()),
            UserError::EmailExists => AppError::Conflict("Email déjà utilisé".to_string()),
            UserError::AuthenticationFailed => {
                AppError::Unauthorized("Email ou mot de passe incorrect".to_string())
            }
            UserError::ValidationError(errors) => AppError::ValidationError(errors),
            UserError::DatabaseError(e) => AppError::from(e),
        }
    }
}

impl UserRepository {
    /// Crée une nouvelle instance du repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Crée un nouvel utilisateur dans la base de données
    ///
    /// # Retourne
    /// * `Ok(User)` - L'utilisateur créé avec son ID généré
    /// * `Err(AppError)` - Email déjà utilisé (409), validation échouée (422), etc.
    pub async fn create(&self, new_user: &NewUser) -> AppResult<User> {
        new_user.validate().map_err(UserError::ValidationError)?;

        if self.email_exists(&new_user.email).await? {
            return Err(UserError::EmailExists.into());
        }

        let hashed_password = hash_password(&new_user.password)?;

        // l'index unique couvre la course entre deux inscriptions simultanées (23505 -> 409)
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, hashed_password, full_name, is_active) \
             VALUES ($1, $2, $3, TRUE) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&new_user.email)
        .bind(&hashed_password)
        .bind(&new_user.full_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Récupère un utilisateur par son ID (actif ou non)
    pub async fn get_by_id(&self, user_id: i64) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(UserError::DatabaseError)?
        .ok_or(UserError::NotFound)?;

        Ok(user)
    }

    /// Récupère un utilisateur par son email
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Authentifie un utilisateur avec email et mot de passe
    ///
    /// Email inconnu, mot de passe faux et compte désactivé produisent la même erreur 401.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let user = match self.find_by_email(email).await? {
            Some(user) => user,
            None => return Err(UserError::AuthenticationFailed.into()),
        };

        if !user.is_active || !verify_password(password, &user.hashed_password)? {
            return Err(UserError::AuthenticationFailed.into());
        }

        Ok(user)
    }

    /// Vérifie si un email est déjà utilisé
    pub async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}
