use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use tracing::error;
use validator::ValidationErrors;

use crate::core::prediction::PredictionError;

/// Type de résultat standard pour l'application
pub type AppResult<T> = Result<T, AppError>;

/// Erreurs principales de l'application
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Erreur d'authentification (401 Unauthorized)
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Permissions insuffisantes (403 Forbidden)
    #[error("Access forbidden: {0}")]
    Forbidden(String),

    /// Ressource non trouvée (404 Not Found)
    #[error("{0} not found")]
    NotFound(String),

    /// Conflit de ressources (409 Conflict)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Données invalides (422 Unprocessable Entity)
    #[error("Validation failed: {0}")]
    ValidationError(ValidationErrors),

    /// Requête mal formée (400 Bad Request)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Erreur interne du serveur (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),

    /// Erreur de base de données (500 Internal Server Error)
    #[error("Database error: {0}")]
    DatabaseError(#[source] SqlxError),

    /// Erreur de configuration (500 Internal Server Error)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Modèles absents ou artefacts illisibles (500 Internal Server Error)
    #[error("Prediction error: {0}")]
    Prediction(#[source] PredictionError),
}

impl AppError {
    /// Convertit l'erreur en code HTTP approprié
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InternalError(_)
            | AppError::DatabaseError(_)
            | AppError::ConfigurationError(_)
            | AppError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convertit l'erreur en message utilisateur-friendly
    /// (à utiliser pour les réponses clients, pas pour le logging)
    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::Forbidden(msg) => msg.clone(),
            AppError::NotFound(resource) => format!("{} non trouvé", resource),
            AppError::Conflict(msg) => msg.clone(),
            AppError::ValidationError(errors) => {
                let mut messages = Vec::new();
                for (field, field_errors) in errors.field_errors() {
                    for error in field_errors {
                        match error.message.as_ref() {
                            Some(msg) => messages.push(format!("{}: {}", field, msg)),
                            None => messages.push(format!("{}: valeur invalide", field)),
                        }
                    }
                }
                if messages.is_empty() {
                    "Données invalides. Veuillez vérifier le format des champs.".to_string()
                } else {
                    messages.sort();
                    messages.join("; ")
                }
            }
            AppError::BadRequest(msg) => msg.clone(),
            AppError::InternalError(_)
            | AppError::DatabaseError(_)
            | AppError::ConfigurationError(_)
            | AppError::Prediction(_) => {
                "Une erreur interne est survenue. Notre équipe technique a été notifiée.".to_string()
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = AppError::status_code(self);
        if status.is_server_error() {
            error!("❌ {}", self);
        }

        let error_response = ErrorResponse {
            error: self.user_friendly_message(),
            code: status.as_u16(),
        };

        HttpResponse::build(status).json(error_response)
    }
}

/// Structure de réponse d'erreur standardisée
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: u16,
}

// Implémentations From pour les conversions automatiques

impl From<SqlxError> for AppError {
    fn from(error: SqlxError) -> Self {
        // Spécialiser certains types d'erreurs SQL
        match &error {
            SqlxError::RowNotFound => AppError::NotFound("Ressource".to_string()),
            SqlxError::Database(db_error) => {
                if db_error.code().map(|code| code == "23505").unwrap_or(false) {
                    AppError::Conflict("Cette ressource existe déjà".to_string())
                } else {
                    AppError::DatabaseError(error)
                }
            }
            _ => AppError::DatabaseError(error),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::ValidationError(errors)
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match error.kind() {
            ErrorKind::ExpiredSignature => AppError::Unauthorized("Token expiré".to_string()),
            ErrorKind::InvalidToken
            | ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::ImmatureSignature
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => AppError::Unauthorized("Token invalide".to_string()),
            _ => AppError::InternalError(format!("JWT error: {}", error)),
        }
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(error: argon2::password_hash::Error) -> Self {
        AppError::InternalError(format!("Erreur de hashage: {}", error))
    }
}

// Helper functions pour créer des erreurs courantes
pub fn not_found<T: Into<String>>(resource: T) -> AppError {
    AppError::NotFound(resource.into())
}

pub fn unauthorized<T: Into<String>>(message: T) -> AppError {
    AppError::Unauthorized(message.into())
}

pub fn forbidden<T: Into<String>>(message: T) -> AppError {
    AppError::Forbidden(message.into())
}


#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 8, message = "trop court"))]
        password: String,
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(not_found("Forage").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".to_string()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::from(PredictionError::ModelsNotLoaded).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err = AppError::from(SqlxError::RowNotFound);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_validation_message_lists_fields() {
        let errors = Sample { password: "abc".to_string() }.validate().unwrap_err();
        let err = AppError::from(errors);
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.user_friendly_message(), "password: trop court");
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::from(PredictionError::ModelsNotLoaded);
        assert!(!err.user_friendly_message().contains("modèles"));
    }

    #[actix_web::test]
    async fn test_error_response_body() {
        let response = not_found("Forage").error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Forage non trouvé", "code": 404 }));
    }
}
