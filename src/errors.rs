use axum::http::{HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use thiserror::Error;

use crate::external::price_provider::PriceProviderError;
use crate::models::ErrorPayload;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("No data available")]
    NoData,
    #[error("Rate limited by data provider")]
    RateLimited,
    #[error("{0}")]
    External(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NoData => StatusCode::NOT_FOUND,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::External(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn payload(&self) -> ErrorPayload {
        match self {
            AppError::Validation(msg) => ErrorPayload::new(msg.clone()),
            other => ErrorPayload::new(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = Json(self.payload());
        match self {
            AppError::RateLimited => {
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static("60"));
                (status, headers, body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

impl From<PriceProviderError> for AppError {
    fn from(value: PriceProviderError) -> Self {
        match value {
            PriceProviderError::NotFound => AppError::NoData,
            PriceProviderError::RateLimited => AppError::RateLimited,
            other => AppError::External(other.to_string()),
        }
    }
}

impl From<String> for AppError {
    fn from(value: String) -> Self {
        AppError::Validation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_errors_map_to_app_errors() {
        assert!(matches!(AppError::from(PriceProviderError::NotFound), AppError::NoData));
        assert!(matches!(AppError::from(PriceProviderError::RateLimited), AppError::RateLimited));

        let err = AppError::from(PriceProviderError::Network("connection reset".into()));
        assert_eq!(err.to_string(), "network error: connection reset");
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_no_data_payload_is_exact() {
        let payload = AppError::NoData.payload();
        assert_eq!(
            serde_json::to_value(payload).unwrap(),
            serde_json::json!({"error": "No data available"})
        );
    }

    #[test]
    fn test_validation_payload_omits_prefix() {
        let payload = AppError::Validation("Symbol must not be empty".into()).payload();
        assert_eq!(payload.error, "Symbol must not be empty");
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let response = AppError::RateLimited.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get("Retry-After").unwrap(), "60");
    }
}
