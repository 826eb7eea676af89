//! Update endpoints, one per operator. Each triggers a full fetch-normalize-
//! upsert cycle and reports the resulting summary.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::ErrorResponse;
use crate::sync::{
    update_an_rothar_nua, update_bleeper_bikes, update_jc_decaux, update_nextbike, UpdateState,
    UpdateSummary,
};

/// Refresh all JC Decaux stations for one contract
#[utoipa::path(
    get,
    path = "/getupdates/stations/jcdecaux/{contract}",
    params(
        ("contract" = String, Path, description = "JC Decaux contract name, e.g. dublin")
    ),
    responses(
        (status = 200, description = "Update summary", body = UpdateSummary),
        (status = 502, description = "Upstream payload or network failure", body = ErrorResponse),
        (status = 504, description = "Upstream timed out", body = ErrorResponse)
    ),
    tag = "updates"
)]
pub async fn update_stations_jc_decaux(
    State(state): State<UpdateState>,
    Path(contract): Path<String>,
) -> Result<Json<UpdateSummary>, ErrorResponse> {
    let summary = update_jc_decaux(&state, &contract).await?;
    Ok(Json(summary))
}

/// Refresh An Rothar Nua stations for one scheme
#[utoipa::path(
    get,
    path = "/getupdates/stations/anrotharnua/{scheme}",
    params(
        ("scheme" = String, Path, description = "Scheme ID: -1 (all cities), 2 (Cork), 3 (Limerick) or 4 (Galway)")
    ),
    responses(
        (status = 200, description = "Update summary", body = UpdateSummary),
        (status = 422, description = "Scheme ID not in the allow-list", body = ErrorResponse),
        (status = 502, description = "Upstream payload or network failure", body = ErrorResponse),
        (status = 504, description = "Upstream timed out", body = ErrorResponse)
    ),
    tag = "updates"
)]
pub async fn update_stations_an_rothar_nua(
    State(state): State<UpdateState>,
    Path(scheme): Path<String>,
) -> Result<Json<UpdateSummary>, ErrorResponse> {
    let summary = update_an_rothar_nua(&state, &scheme).await?;
    Ok(Json(summary))
}

/// Refresh all Nextbike stations in one city
#[utoipa::path(
    get,
    path = "/getupdates/stations/nextbike/{city}",
    params(
        ("city" = String, Path, description = "Numeric Nextbike city ID, e.g. 238 for Belfast")
    ),
    responses(
        (status = 200, description = "Update summary", body = UpdateSummary),
        (status = 502, description = "Upstream payload or network failure", body = ErrorResponse),
        (status = 504, description = "Upstream timed out", body = ErrorResponse)
    ),
    tag = "updates"
)]
pub async fn update_stations_nextbike(
    State(state): State<UpdateState>,
    Path(city): Path<String>,
) -> Result<Json<UpdateSummary>, ErrorResponse> {
    let summary = update_nextbike(&state, &city).await?;
    Ok(Json(summary))
}

/// Refresh the Bleeper Bikes dockless snapshot
#[utoipa::path(
    get,
    path = "/getupdates/bikes/bleeperbikes",
    responses(
        (status = 200, description = "Update summary", body = UpdateSummary),
        (status = 502, description = "Upstream payload or network failure", body = ErrorResponse),
        (status = 504, description = "Upstream timed out", body = ErrorResponse)
    ),
    tag = "updates"
)]
pub async fn update_bikes_bleeper(
    State(state): State<UpdateState>,
) -> Result<Json<UpdateSummary>, ErrorResponse> {
    let summary = update_bleeper_bikes(&state).await?;
    Ok(Json(summary))
}

pub fn router(state: UpdateState) -> Router {
    Router::new()
        .route("/stations/jcdecaux/{contract}", get(update_stations_jc_decaux))
        .route(
            "/stations/anrotharnua/{scheme}",
            get(update_stations_an_rothar_nua),
        )
        .route("/stations/nextbike/{city}", get(update_stations_nextbike))
        .route("/bikes/bleeperbikes", get(update_bikes_bleeper))
        .with_state(state)
}
