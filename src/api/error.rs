// =============================================================================
// API Errors: one variant per failure the HTTP layer can report
// =============================================================================
//
// Every failure renders as `{ "error": "<message>" }`. Upstream details are
// logged where the failure happens and never echoed to the client.
// =============================================================================

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::signals::AnalysisError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Price history provider failed or returned nothing usable (500).
    #[error("Failed to fetch data")]
    PriceDataUnavailable,

    /// News provider failed or returned no headlines (500).
    #[error("Failed to fetch news")]
    NewsUnavailable,

    /// Not enough history to fill one RSI window (500).
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Malformed query parameters (400).
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PriceDataUnavailable | Self::NewsUnavailable | Self::Analysis(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = axum::Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

/// Result type alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_messages_match_public_contract() {
        assert_eq!(ApiError::PriceDataUnavailable.to_string(), "Failed to fetch data");
        assert_eq!(ApiError::NewsUnavailable.to_string(), "Failed to fetch news");
    }

    #[test]
    fn insufficient_data_is_server_error_with_clear_message() {
        let err = ApiError::from(AnalysisError::InsufficientData {
            required: 15,
            available: 5,
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Insufficient price history: need at least 15 points, got 5"
        );
    }

    #[test]
    fn bad_request_maps_to_400() {
        let resp = ApiError::BadRequest("days must be at least 1".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
