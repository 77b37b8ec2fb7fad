use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    api::routes::middleware::CurrentUser,
    core::user_service::UserService,
    domain::user::{NewUser, UserLogin, UserProfile},
    infrastructure::database::{Database, UserRepository},
    infrastructure::error::AppResult,
    utils::security::JwtConfig,
};

fn user_service(db: &Database, jwt: &JwtConfig) -> UserService {
    UserService::new(UserRepository::new(db.pool.clone()), jwt.clone())
}

/// Endpoint d'inscription
#[post("/auth/register")]
pub async fn register(
    new_user: web::Json<NewUser>,
    db: web::Data<Database>,
    jwt: web::Data<JwtConfig>,
) -> AppResult<HttpResponse> {
    // Validation des inputs
    new_user.validate()?;

    let user = user_service(&db, &jwt).register(&new_user).await?;

    Ok(HttpResponse::Created().json(UserProfile::from(user)))
}

/// Endpoint de connexion (email/mot de passe)
#[post("/auth/login")]
pub async fn login(
    credentials: web::Json<UserLogin>,
    db: web::Data<Database>,
    jwt: web::Data<JwtConfig>,
) -> AppResult<HttpResponse> {
    let token = user_service(&db, &jwt).login(&credentials).await?;

    Ok(HttpResponse::Ok().json(token))
}

/// Profil de l'utilisateur authentifié
#[get("/auth/me")]
pub async fn me(current_user: CurrentUser) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(UserProfile::from(current_user.0)))
}
