pub mod error;
pub mod health;
pub mod updates;

pub use error::ErrorResponse;

use axum::Router;

use crate::sync::UpdateState;

pub fn router(state: UpdateState) -> Router {
    Router::new()
        .nest("/getupdates", updates::router(state.clone()))
        .nest("/health", health::router(state.pool))
}
