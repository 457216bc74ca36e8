use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::services::errors::{ConversionError, RateError};

#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub retryable: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    status: u16,                   // HTTP status code
    error: String,                 // Short error identifier
    message: String,               // Human-readable error message
    details: Option<ErrorDetails>, // Optional details for the client
}

impl ErrorResponse {
    pub fn new(
        status: StatusCode,
        error: &str,
        message: &str,
        details: Option<ErrorDetails>,
    ) -> Self {
        ErrorResponse {
            status: status.as_u16(),
            error: error.to_string(),
            message: message.to_string(),
            details,
        }
    }

    pub fn rate_failed(message: &str, retryable: bool) -> Self {
        ErrorResponse::new(
            StatusCode::BAD_GATEWAY,
            if retryable {
                "rates_unavailable"
            } else {
                "rate_lookup_failed"
            },
            message,
            Some(ErrorDetails { retryable }),
        )
    }
}

impl From<RateError> for ErrorResponse {
    fn from(err: RateError) -> Self {
        match err {
            RateError::Network(_) | RateError::Parse(_) => {
                ErrorResponse::rate_failed(&err.to_string(), err.is_retryable())
            }
            RateError::UnknownCurrency { .. } => ErrorResponse::new(
                StatusCode::NOT_FOUND,
                "unknown_currency",
                &err.to_string(),
                None,
            ),
        }
    }
}

impl From<ConversionError> for ErrorResponse {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::InvalidAmount(_) => ErrorResponse::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_amount",
                &err.to_string(),
                None,
            ),
            ConversionError::Overflow { .. } => ErrorResponse::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "amount_too_large",
                &err.to_string(),
                None,
            ),
            ConversionError::RateUnavailable { .. } => ErrorResponse::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "rate_unavailable",
                &err.to_string(),
                Some(ErrorDetails { retryable: true }),
            ),
            ConversionError::UnknownCurrency(_) => ErrorResponse::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "unknown_currency",
                &err.to_string(),
                None,
            ),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
