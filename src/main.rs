pub mod api;
mod config;
mod providers;
mod sync;

use std::path::Path;

use axum::{routing::get, Router};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::Config;
use providers::OperatorClient;
use sync::UpdateState;

#[derive(OpenApi)]
#[openapi(
    info(title = "Bike Share Availability API", version = "0.2.0"),
    paths(
        api::updates::update_stations_jc_decaux,
        api::updates::update_stations_an_rothar_nua,
        api::updates::update_stations_nextbike,
        api::updates::update_bikes_bleeper,
        api::health::health_check,
    ),
    components(schemas(
        api::ErrorResponse,
        api::health::HealthResponse,
        sync::UpdateSummary,
    )),
    tags(
        (name = "updates", description = "Trigger per-operator availability updates"),
        (name = "health", description = "Service health check")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info,sqlx=warn".into()),
        )
        .init();

    // Load config
    let config = Config::load("config.yaml").expect("Failed to load config");
    tracing::info!("Loaded configuration");

    // Initialize SQLite database
    if let Some(parent) = Path::new(&config.database_path).parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Could not create database directory: {}", e);
            }
        }
    }
    let db_url = format!("sqlite:{}?mode=rwc", config.database_path);
    let pool = SqlitePool::connect(&db_url)
        .await
        .expect("Failed to connect to SQLite database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Database migrations completed");

    let client = OperatorClient::new().expect("Failed to build operator HTTP client");
    let state = UpdateState {
        pool,
        client,
        keys: config.operator_api_keys.clone(),
    };

    // Build the app
    let app = Router::new()
        .route("/", get(root))
        .merge(api::router(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http());

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind server address");

    tracing::info!("Server running on http://{}", config.bind_addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui", config.bind_addr);

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}

async fn root() -> &'static str {
    "Bike Share Availability API"
}
