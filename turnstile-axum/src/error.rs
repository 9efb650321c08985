use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use turnstile::TurnstileError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or rejected input, including a passcode that is absent,
    /// expired or wrong.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// A passcode was requested during the resend cooldown.
    #[error("Passcode requested too recently")]
    RateLimited,

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<TurnstileError> for ApiError {
    fn from(err: TurnstileError) -> Self {
        if err.is_rate_limited() {
            ApiError::RateLimited
        } else if err.is_bad_request() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::InternalError(err.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            ApiError::RateLimited => {
                (StatusCode::TOO_MANY_REQUESTS, "Passcode requested too recently")
            }
            ApiError::InternalError(ref msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.as_str()),
        };

        let body = Json(json!({
            "error": error_message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
