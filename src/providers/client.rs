use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Fixed deadline for every outbound operator call. Calls that exceed it
/// fail with [`FetchError::Timeout`]; there is no retry.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP method {0} is not supported; use GET or POST")]
    UnsupportedMethod(Method),
    #[error("Operator API request timed out")]
    Timeout,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Upstream error {status}: {reason}")]
    Upstream { status: u16, reason: String },
    #[error("Failed to decode upstream JSON: {0}")]
    Decode(String),
}

/// HTTP client for outbound operator API calls.
#[derive(Clone)]
pub struct OperatorClient {
    client: reqwest::Client,
}

impl OperatorClient {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Issue one request against an operator endpoint and decode the JSON body.
    ///
    /// Only GET and POST are supported; any other verb fails before a network
    /// call is made. POST parameters are sent as a form-encoded body, GET
    /// sends no body. Status 200 and 201 both count as success (Bleeper Bikes
    /// answers 201); any other status is forwarded as an upstream error.
    pub async fn fetch(
        &self,
        method: Method,
        url: &str,
        form: Option<&[(&str, String)]>,
    ) -> Result<Value, FetchError> {
        let request = match method {
            Method::GET => self.client.get(url),
            Method::POST => match form {
                Some(params) => self.client.post(url).form(params),
                None => self.client.post(url),
            },
            other => return Err(FetchError::UnsupportedMethod(other)),
        };

        debug!(%method, url, "Calling operator API");

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        classify_status(status)?;
        debug!(%method, status = status.as_u16(), "Operator API responded");

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// The Bleeper Bikes API returns 201 for successful responses, so both 200
/// and 201 classify as success.
fn classify_status(status: StatusCode) -> Result<(), FetchError> {
    if status == StatusCode::OK || status == StatusCode::CREATED {
        return Ok(());
    }

    Err(FetchError::Upstream {
        status: status.as_u16(),
        reason: status
            .canonical_reason()
            .unwrap_or("Unknown")
            .to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_200_is_success() {
        assert!(classify_status(StatusCode::OK).is_ok());
    }

    #[test]
    fn status_201_is_success() {
        assert!(classify_status(StatusCode::CREATED).is_ok());
    }

    #[test]
    fn status_503_is_upstream_error() {
        let err = classify_status(StatusCode::SERVICE_UNAVAILABLE).unwrap_err();
        match err {
            FetchError::Upstream { status, reason } => {
                assert_eq!(status, 503);
                assert_eq!(reason, "Service Unavailable");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[test]
    fn status_404_is_upstream_error() {
        let err = classify_status(StatusCode::NOT_FOUND).unwrap_err();
        assert!(matches!(err, FetchError::Upstream { status: 404, .. }));
    }

    #[tokio::test]
    async fn unsupported_method_fails_without_network_call() {
        let client = OperatorClient::new().unwrap();
        // localhost:1 would refuse the connection if the request were sent
        let err = client
            .fetch(Method::DELETE, "http://localhost:1/", None)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedMethod(_)));
    }
}
