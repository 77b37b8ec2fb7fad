// core/mod.rs
pub mod borewell_service;
pub mod prediction;
pub mod user_service;

// Ré-exports pour faciliter l'import
pub use borewell_service::BorewellService;
pub use prediction::{ModelRegistry, PredictionResult, Predictor};
pub use user_service::{AuthToken, UserService};
