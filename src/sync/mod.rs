//! One update cycle per operator: fetch the live payload, normalize every
//! entity, upsert the batch, report a summary.

pub mod normalize;
pub mod store;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use utoipa::ToSchema;

use crate::config::OperatorApiKeys;
use crate::providers::{
    an_rothar_nua, bleeper_bikes, jc_decaux, nextbike, FetchError, Operator, OperatorClient,
};
use normalize::PayloadError;

/// Outcome of one update cycle. `matched` counts entities whose identity
/// already existed in the store (whether or not the content changed);
/// `modified` counts records whose stored content actually changed. A fresh
/// insert increments neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct UpdateSummary {
    pub matched: u64,
    pub modified: u64,
}

#[derive(Debug, Error)]
pub enum UpdateError {
    /// Caller-supplied parameter failed a local check; no network call made.
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Upstream payload error: {0}")]
    Payload(#[from] PayloadError),
    #[error("Database error: {0}")]
    Database(String),
}

/// Everything one update cycle needs: the connection pool, the outbound
/// client and the operator credentials loaded at startup.
#[derive(Clone)]
pub struct UpdateState {
    pub pool: SqlitePool,
    pub client: OperatorClient,
    pub keys: OperatorApiKeys,
}

/// Fetch all JC Decaux stations for one contract (town or city) and upsert
/// them.
pub async fn update_jc_decaux(
    state: &UpdateState,
    contract: &str,
) -> Result<UpdateSummary, UpdateError> {
    let url = jc_decaux::stations_url(contract, &state.keys.jc_decaux);
    let payload = state.client.fetch(Method::GET, &url, None).await?;
    apply_update(&state.pool, Operator::JcDecaux, &payload).await
}

/// Fetch An Rothar Nua stations for one scheme and upsert them. The scheme
/// identifier is validated against the fixed allow-list before any network
/// call.
pub async fn update_an_rothar_nua(
    state: &UpdateState,
    scheme: &str,
) -> Result<UpdateSummary, UpdateError> {
    if !an_rothar_nua::is_valid_scheme(scheme) {
        return Err(UpdateError::Validation(format!(
            "Invalid scheme ID {scheme}. Valid scheme IDs are -1 (all cities), 2 (Cork), 3 (Limerick), 4 (Galway)."
        )));
    }

    let form = an_rothar_nua::station_list_form(&state.keys.an_rothar_nua, scheme);
    let payload = state
        .client
        .fetch(Method::POST, an_rothar_nua::BASE_URL, Some(&form))
        .await?;
    apply_update(&state.pool, Operator::AnRotharNua, &payload).await
}

/// Fetch all Nextbike stations in one city (numeric Nextbike city ID) and
/// upsert them.
pub async fn update_nextbike(
    state: &UpdateState,
    city: &str,
) -> Result<UpdateSummary, UpdateError> {
    let url = nextbike::live_url(city);
    let payload = state.client.fetch(Method::GET, &url, None).await?;
    apply_update(&state.pool, Operator::Nextbike, &payload).await
}

/// Fetch the latest Bleeper Bikes snapshot (all dockless bikes) and upsert it.
pub async fn update_bleeper_bikes(state: &UpdateState) -> Result<UpdateSummary, UpdateError> {
    let payload = state
        .client
        .fetch(Method::GET, bleeper_bikes::SNAPSHOT_URL, None)
        .await?;
    apply_update(&state.pool, Operator::BleeperBikes, &payload).await
}

/// Normalize a raw operator payload and upsert every entity it contains.
/// This is the whole pipeline after the network hop.
pub async fn apply_update(
    pool: &SqlitePool,
    operator: Operator,
    payload: &Value,
) -> Result<UpdateSummary, UpdateError> {
    let entities = normalize::extract(operator, payload)?;
    let normalized = entities
        .iter()
        .map(|entity| normalize::pointify(operator, entity))
        .collect::<Result<Vec<_>, _>>()?;

    let summary = store::upsert(pool, operator, &normalized).await?;

    info!(
        operator = operator.tag(),
        entities = normalized.len(),
        matched = summary.matched,
        modified = summary.modified,
        "Completed update cycle"
    );

    Ok(summary)
}
