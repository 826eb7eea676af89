//! The error envelope every endpoint returns on failure.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::providers::FetchError;
use crate::sync::UpdateError;

/// Failure body returned by every endpoint. The HTTP status is repeated in
/// the body so clients reading only the JSON still see it.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[serde(rename = "HTTP Status")]
    pub status: u16,
    #[serde(rename = "Reason")]
    pub reason: String,
}

impl From<UpdateError> for ErrorResponse {
    /// Map each failure to its response status: caller mistakes are 422,
    /// upstream statuses are forwarded verbatim, upstream timeouts are 504,
    /// other upstream trouble is 502 and our own storage failing is 500.
    fn from(err: UpdateError) -> Self {
        let status = match &err {
            UpdateError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            UpdateError::Fetch(FetchError::UnsupportedMethod(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            UpdateError::Fetch(FetchError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            UpdateError::Fetch(FetchError::Upstream { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            UpdateError::Fetch(FetchError::Network(_) | FetchError::Decode(_)) => {
                StatusCode::BAD_GATEWAY
            }
            UpdateError::Payload(_) => StatusCode::BAD_GATEWAY,
            UpdateError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        ErrorResponse {
            status: status.as_u16(),
            reason: err.to_string(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
