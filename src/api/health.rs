use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Whether the service is running
    pub healthy: bool,
    /// Whether the SQLite database answers a probe query
    pub database_reachable: bool,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health status", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(pool): State<SqlitePool>) -> Json<HealthResponse> {
    let database_reachable = sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&pool)
        .await
        .is_ok();

    Json(HealthResponse {
        healthy: true,
        database_reachable,
    })
}

pub fn router(pool: SqlitePool) -> Router {
    Router::new().route("/", get(health_check)).with_state(pool)
}
