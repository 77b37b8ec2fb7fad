use actix_web::{get, patch, post, web, HttpResponse};

use crate::{
    api::routes::middleware::CurrentUser,
    core::{prediction::Predictor, BorewellService},
    domain::borewell::{BorewellOutcome, BorewellView, Coordinates},
    infrastructure::database::{BorewellRepository, Database},
    infrastructure::error::AppResult,
};

fn borewell_service(db: &Database, predictor: &Predictor) -> BorewellService {
    BorewellService::new(BorewellRepository::new(db.pool.clone()), predictor.clone())
}

/// Prédit et enregistre un forage pour l'utilisateur courant
#[post("/borewells")]
pub async fn create_borewell(
    current_user: CurrentUser,
    site: web::Json<Coordinates>,
    db: web::Data<Database>,
    predictor: web::Data<Predictor>,
) -> AppResult<HttpResponse> {
    let borewell = borewell_service(&db, &predictor)
        .record_prediction(current_user.0.id, &site)
        .await?;

    Ok(HttpResponse::Created().json(BorewellView::from(borewell)))
}

/// Liste les forages de l'utilisateur courant (plus récents d'abord)
#[get("/borewells")]
pub async fn list_borewells(
    current_user: CurrentUser,
    db: web::Data<Database>,
    predictor: web::Data<Predictor>,
) -> AppResult<HttpResponse> {
    let borewells: Vec<BorewellView> = borewell_service(&db, &predictor)
        .list_for_owner(current_user.0.id)
        .await?
        .into_iter()
        .map(BorewellView::from)
        .collect();

    Ok(HttpResponse::Ok().json(borewells))
}

/// Enregistre le résultat réel d'un forage
#[patch("/borewells/{id}/outcome")]
pub async fn update_outcome(
    current_user: CurrentUser,
    path: web::Path<i64>,
    outcome: web::Json<BorewellOutcome>,
    db: web::Data<Database>,
    predictor: web::Data<Predictor>,
) -> AppResult<HttpResponse> {
    let borewell = borewell_service(&db, &predictor)
        .record_outcome(current_user.0.id, path.into_inner(), &outcome)
        .await?;

    Ok(HttpResponse::Ok().json(BorewellView::from(borewell)))
}
