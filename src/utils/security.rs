// utils/security.rs
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::infrastructure::error::{AppError, AppResult};

/// Paramètres de signature des tokens d'accès
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: Duration,
}

/// Claims JWT pour les tokens d'accès
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,      // User ID
    pub exp: usize,       // Expiration timestamp
    pub iat: usize,       // Issued at timestamp
    pub jti: String,      // Token ID
}

impl AccessTokenClaims {
    /// Identifiant de l'utilisateur porté par le token
    pub fn user_id(&self) -> AppResult<i64> {
        self.sub
            .parse()
            .map_err(|_| AppError::Unauthorized("Token invalide".to_string()))
    }
}

/// Générer un token d'accès JWT (HS256)
pub fn generate_access_token(user_id: i64, config: &JwtConfig) -> AppResult<String> {
    let now = Utc::now();
    let expires_at = now + config.access_token_expiry;

    let claims = AccessTokenClaims {
        sub: user_id.to_string(),
        exp: expires_at.timestamp().max(0) as usize,
        iat: now.timestamp().max(0) as usize,
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Vérifier un token d'accès (signature et expiration)
pub fn verify_access_token(token: &str, config: &JwtConfig) -> AppResult<AccessTokenClaims> {
    let token_data = decode::<AccessTokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Générer un hash de mot de passe avec Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Vérifier un mot de passe contre un hash
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-with-enough-entropy-123".to_string(),
            access_token_expiry: Duration::minutes(1440),
        }
    }

    #[test]
    fn test_token_roundtrip_carries_user_id() {
        let config = jwt_config();
        let token = generate_access_token(42, &config).unwrap();

        let claims = verify_access_token(&token, &config).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_with_wrong_secret_is_rejected() {
        let token = generate_access_token(42, &jwt_config()).unwrap();
        let other = JwtConfig {
            secret: "another-secret".to_string(),
            ..jwt_config()
        };

        let err = verify_access_token(&token, &other).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let expired = JwtConfig {
            access_token_expiry: Duration::minutes(-10),
            ..jwt_config()
        };
        let token = generate_access_token(42, &expired).unwrap();

        match verify_access_token(&token, &jwt_config()) {
            Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Token expiré"),
            other => panic!("résultat inattendu: {:?}", other),
        }
    }

    #[test]
    fn test_garbage_token_is_unauthorized() {
        let err = verify_access_token("pas.un.token", &jwt_config()).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_non_numeric_subject_is_unauthorized() {
        let claims = AccessTokenClaims {
            sub: "abc".to_string(),
            exp: 0,
            iat: 0,
            jti: String::new(),
        };
        assert!(matches!(claims.user_id(), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("borewell-2024").unwrap();
        assert_ne!(hash, "borewell-2024");
        assert!(verify_password("borewell-2024", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("whatever", "not-a-phc-string").is_err());
    }
}
