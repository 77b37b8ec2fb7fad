//! # Authentification des requêtes
//!
//! L'extracteur `CurrentUser` protège une route : il lit l'en-tête
//! `Authorization: Bearer <token>`, vérifie le JWT puis charge l'utilisateur.
//! Toute erreur produit une réponse 401 au format standard des erreurs.

use actix_web::{
    dev::Payload,
    http::header::{HeaderMap, AUTHORIZATION},
    web, FromRequest, HttpRequest,
};
use futures_util::future::LocalBoxFuture;

use crate::{
    core::user_service::UserService,
    domain::user::User,
    infrastructure::database::{Database, UserRepository},
    infrastructure::error::{unauthorized, AppError, AppResult},
    utils::security::JwtConfig,
};

/// Utilisateur authentifié associé à la requête
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req.headers());
        let db = req.app_data::<web::Data<Database>>().cloned();
        let jwt = req.app_data::<web::Data<JwtConfig>>().cloned();

        Box::pin(async move {
            let token = token?;
            let (db, jwt) = match (db, jwt) {
                (Some(db), Some(jwt)) => (db, jwt),
                _ => {
                    return Err(AppError::ConfigurationError(
                        "Database ou JwtConfig absent des données de l'application".to_string(),
                    ))
                }
            };

            let service = UserService::new(UserRepository::new(db.pool.clone()), jwt.get_ref().clone());
            service.current_user(&token).await.map(CurrentUser)
        })
    }
}

/// Extrait le token d'un en-tête `Authorization: Bearer <token>`
fn bearer_token(headers: &HeaderMap) -> AppResult<String> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Token d'authentification manquant"))?
        .to_str()
        .map_err(|_| unauthorized("En-tête Authorization invalide"))?;

    match header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim().to_string())
        }
        _ => Err(unauthorized("En-tête Authorization invalide")),
    }
}
