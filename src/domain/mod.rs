//! # Domain Models Module
//!
//! Entités métier partagées par l'API, les services et la base de données.
//!
//! ## Structure
//! - `user.rs`: utilisateurs authentifiés
//! - `borewell.rs`: sites de forage, prédictions enregistrées et résultats terrain
//!
//! ## Conventions
//! - Les identifiants sont des `i64` générés par PostgreSQL (`BIGSERIAL`)
//! - Les champs sensibles sont exclus de la sérialisation JSON
//! - Les timestamps utilisent `chrono::DateTime<chrono::Utc>`

pub mod borewell;
pub mod user;

pub use borewell::{Borewell, BorewellOutcome, BorewellView, Coordinates, NewBorewell};
pub use user::{NewUser, User, UserLogin, UserProfile};
