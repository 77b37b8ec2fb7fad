// utils/mod.rs
pub mod config;
pub mod helpers;
pub mod security;

// Ré-exports pour faciliter l'import
pub use config::Config;
pub use helpers::retry_with_delay;
pub use security::{
    generate_access_token, hash_password, verify_access_token, verify_password,
    AccessTokenClaims, JwtConfig,
};
