use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use raksh_backend::{
    api,
    core::prediction::{ModelRegistry, Predictor},
    infrastructure::database::Database,
    utils::config::Config,
    NAME, VERSION,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Chargement de la configuration
    let config = Config::from_env()?;

    // Initialisation du logging
    setup_tracing(&config.log_level, &config.log_format);
    info!("🚀 Démarrage de {} v{}", NAME, VERSION);
    info!("🔧 Mode: {}", config.run_mode);
    for warning in config.warnings() {
        warn!("⚠️  {}", warning);
    }

    // Base de données : connexion (avec nouvelles tentatives) puis schéma
    let db = Database::connect_with_retry(
        &config.database_url,
        config.database_max_connections,
        config.database_connect_max_retries,
        config.database_retry_delay(),
    )
    .await?;
    db.init_schema().await?;

    // Modèles de prédiction : chargés avant d'accepter du trafic
    let registry = Arc::new(ModelRegistry::new(&config.models_dir));
    registry.load()?;
    let predictor = Predictor::new(registry);

    let db = web::Data::new(db);
    let predictor = web::Data::new(predictor);
    let jwt = web::Data::new(config.jwt());

    // Configuration du serveur Actix-Web
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(db.clone())
            .app_data(predictor.clone())
            .app_data(jwt.clone())
            .configure(api::config)
    })
    .bind(config.server_address())?
    .workers(config.workers)
    .shutdown_timeout(10);

    info!("✅ Backend démarré avec succès!");
    info!("🔗 API disponible sur http://{}", config.server_address());

    server.run().await?;
    Ok(())
}

/// Configure le tracing pour le logging structuré
fn setup_tracing(log_level: &str, log_format: &str) {
    let log_level = log_level.parse().unwrap_or(tracing::Level::INFO);

    let subscriber = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(log_level.into()),
        )
        .with(if log_format == "json" {
            Box::new(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_list(true),
            ) as Box<dyn tracing_subscriber::Layer<_> + Send + Sync>
        } else {
            Box::new(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_line_number(true)
                    .with_file(true),
            ) as Box<dyn tracing_subscriber::Layer<_> + Send + Sync>
        });

    subscriber.init();
}
