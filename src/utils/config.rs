// utils/config.rs
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::infrastructure::error::{AppError, AppResult};
use crate::utils::security::JwtConfig;

#[derive(Debug, Clone)]
pub struct Config {
    // Environnement et serveur
    pub run_mode: String,
    pub server_host: String,
    pub server_port: u16,
    pub workers: usize,
    pub log_level: String,
    pub log_format: String,

    // Base de données
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_connect_max_retries: u32,
    pub database_connect_retry_delay_seconds: u64,

    // Sécurité
    pub jwt_secret: String,
    pub jwt_access_token_expiry_minutes: i64,

    // Modèles de prédiction
    pub models_dir: PathBuf,
}

impl Config {
    /// Charger la configuration depuis les variables d'environnement
    pub fn from_env() -> AppResult<Self> {
        // Charger le fichier .env si présent
        let _ = dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construit la configuration à partir d'une source de variables quelconque
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Config {
            run_mode: or_default(&lookup, "RUN_MODE", "development"),
            server_host: or_default(&lookup, "SERVER_HOST", "0.0.0.0"),
            server_port: parsed(&lookup, "SERVER_PORT", 8000)?,
            workers: parsed(&lookup, "WORKERS", 4)?,
            log_level: or_default(&lookup, "LOG_LEVEL", "info"),
            log_format: or_default(&lookup, "LOG_FORMAT", "json"),

            database_url: required(&lookup, "DATABASE_URL")?,
            database_max_connections: parsed(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            database_connect_max_retries: parsed(&lookup, "DATABASE_CONNECT_MAX_RETRIES", 10)?,
            database_connect_retry_delay_seconds: parsed(
                &lookup,
                "DATABASE_CONNECT_RETRY_DELAY_SECONDS",
                3,
            )?,

            jwt_secret: required(&lookup, "JWT_SECRET")?,
            jwt_access_token_expiry_minutes: parsed(
                &lookup,
                "JWT_ACCESS_TOKEN_EXPIRY_MINUTES",
                1440,
            )?,

            models_dir: PathBuf::from(or_default(&lookup, "MODELS_DIR", "models")),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        if self.workers == 0 {
            return Err(AppError::ConfigurationError(
                "WORKERS doit être supérieur à 0".to_string(),
            ));
        }
        if self.database_max_connections == 0 {
            return Err(AppError::ConfigurationError(
                "DATABASE_MAX_CONNECTIONS doit être supérieur à 0".to_string(),
            ));
        }
        if self.jwt_access_token_expiry_minutes <= 0 {
            return Err(AppError::ConfigurationError(
                "JWT_ACCESS_TOKEN_EXPIRY_MINUTES doit être positif".to_string(),
            ));
        }
        Ok(())
    }

    /// Réglages acceptés mais risqués, à journaliser une fois le tracing initialisé
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.jwt_secret.len() < 32 {
            warnings.push("JWT_SECRET trop court (< 32 caractères) - risque de sécurité".to_string());
        }
        warnings
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn database_retry_delay(&self) -> Duration {
        Duration::from_secs(self.database_connect_retry_delay_seconds)
    }

    pub fn jwt(&self) -> JwtConfig {
        JwtConfig {
            secret: self.jwt_secret.clone(),
            access_token_expiry: chrono::Duration::minutes(self.jwt_access_token_expiry_minutes),
        }
    }
}

fn required<F>(lookup: &F, key: &str) -> AppResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::ConfigurationError(format!(
            "Variable d'environnement requise manquante: {}",
            key
        ))),
    }
}

fn or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            AppError::ConfigurationError(format!("{} doit être un nombre (reçu: {:?})", key, raw))
        }),
    }
}
