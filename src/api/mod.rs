pub mod routes;

use actix_web::{error::JsonPayloadError, web, HttpRequest, HttpResponse};

use crate::core::prediction::Predictor;
use crate::infrastructure::error::AppError;

/// Configure toutes les routes de l'API
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        // Routes publiques
        .service(routes::auth::register)
        .service(routes::auth::login)
        .service(routes::predict::predict)
        // Routes protégées par l'extracteur CurrentUser
        .service(routes::auth::me)
        .service(routes::borewells::create_borewell)
        .service(routes::borewells::list_borewells)
        .service(routes::borewells::update_outcome);

    // Endpoint de santé
    cfg.service(web::resource("/health").route(web::get().to(health_check)));
}

/// Corps JSON illisible ou incomplet : 400 au format standard
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Corps de requête invalide: {}", err)).into()
}

/// Endpoint de santé pour monitoring
async fn health_check(predictor: web::Data<Predictor>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "models_loaded": predictor.registry().is_loaded(),
        "model_version": predictor.model_version(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prediction::testing::{constant_predictor, unloaded_predictor};
    use crate::infrastructure::database::Database;
    use crate::utils::security::{generate_access_token, JwtConfig};
    use actix_web::{http::StatusCode, test, App};
    use assert_json_diff::assert_json_eq;
    use serde_json::{json, Value};

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "api-test-secret-0123456789abcdefghij".to_string(),
            access_token_expiry: chrono::Duration::minutes(60),
        }
    }

    macro_rules! test_app {
        ($predictor:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(Database::new_test()))
                    .app_data(web::Data::new($predictor))
                    .app_data(web::Data::new(jwt()))
                    .configure(config),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_health_reports_loaded_models() {
        let app = test_app!(constant_predictor(0.73, 145.7));
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_json_eq!(
            body,
            json!({
                "status": "ok",
                "models_loaded": true,
                "model_version": "v1.0-rf",
                "version": env!("CARGO_PKG_VERSION"),
            })
        );
    }

    #[actix_web::test]
    async fn test_health_before_load() {
        let app = test_app!(unloaded_predictor());
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["models_loaded"], false);
    }

    #[actix_web::test]
    async fn test_predict_feasible_site() {
        let app = test_app!(constant_predictor(0.73, 145.7));
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(json!({ "latitude": 21.5, "longitude": 76.0 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_json_eq!(
            body,
            json!({
                "latitude": 21.5,
                "longitude": 76.0,
                "predicted_feasible": true,
                "predicted_depth_m": 145.7,
                "model_version": "v1.0-rf",
            })
        );
    }

    #[actix_web::test]
    async fn test_predict_infeasible_site_has_zero_depth() {
        let app = test_app!(constant_predictor(0.42, 130.0));
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(json!({ "latitude": 21.5, "longitude": 76.0 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["predicted_feasible"], false);
        assert_eq!(body["predicted_depth_m"], 0.0);
    }

    #[actix_web::test]
    async fn test_predict_before_load_is_internal_error() {
        let app = test_app!(unloaded_predictor());
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(json!({ "latitude": 21.5, "longitude": 76.0 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 500);
    }

    #[actix_web::test]
    async fn test_predict_rejects_malformed_body() {
        let app = test_app!(constant_predictor(0.73, 145.7));
        let req = test::TestRequest::post()
            .uri("/predict")
            .set_json(json!({ "latitude": "nord" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 400);
    }

    #[actix_web::test]
    async fn test_protected_routes_require_token() {
        let app = test_app!(constant_predictor(0.73, 145.7));

        let requests = vec![
            test::TestRequest::get().uri("/auth/me").to_request(),
            test::TestRequest::get().uri("/borewells").to_request(),
            test::TestRequest::post()
                .uri("/borewells")
                .set_json(json!({ "latitude": 21.5, "longitude": 76.0 }))
                .to_request(),
            test::TestRequest::patch()
                .uri("/borewells/1/outcome")
                .set_json(json!({ "actual_feasible": true, "actual_depth_m": 120.0 }))
                .to_request(),
        ];

        for req in requests {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[actix_web::test]
    async fn test_invalid_token_is_unauthorized() {
        let app = test_app!(constant_predictor(0.73, 145.7));

        let forged = generate_access_token(
            1,
            &JwtConfig { secret: "another-secret".to_string(), ..jwt() },
        )
        .unwrap();

        for header in [format!("Bearer {}", forged), "Bearer garbage".to_string(), "Basic abc".to_string()] {
            let req = test::TestRequest::get()
                .uri("/borewells")
                .insert_header(("Authorization", header))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[actix_web::test]
    async fn test_register_validation_happens_before_database() {
        let app = test_app!(constant_predictor(0.73, 145.7));
        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({ "email": "farmer@example.com", "password": "court" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 422);
        assert!(body["error"].as_str().unwrap().starts_with("password:"));
    }

    #[actix_web::test]
    async fn test_login_rejects_malformed_email() {
        let app = test_app!(constant_predictor(0.73, 145.7));
        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({ "email": "farmer", "password": "borewell-2024" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
