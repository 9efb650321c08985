use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use turnstile::{RepositoryProvider, Turnstile};

use crate::{
    error::{ApiError, Result},
    middleware::AuthState,
    types::*,
};

/// Build the tracker routes, ready to be nested (typically at `/auth`).
pub fn create_router<R>(turnstile: Arc<Turnstile<R>>) -> Router
where
    R: RepositoryProvider + 'static,
{
    let state = AuthState { turnstile };

    Router::new()
        .route("/otp/request", post(request_otp_handler))
        .route("/otp/required", get(otp_required_handler))
        .route("/otp/verify", post(verify_otp_handler))
        .route("/login/failure", post(login_failure_handler))
        .route("/login/success", post(login_success_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

fn require(field: Option<String>, name: &str) -> Result<String> {
    field.ok_or_else(|| ApiError::BadRequest(format!("Missing required field: {name}")))
}

async fn request_otp_handler<R>(
    State(state): State<AuthState<R>>,
    Json(payload): Json<EmailRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let email = require(payload.email, "email")?;
    state.turnstile.request_otp(&email).await?;
    Ok(Json(SuccessResponse { success: true }))
}

async fn otp_required_handler<R>(
    State(state): State<AuthState<R>>,
    Query(params): Query<EmailQuery>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let email = require(params.email, "email")?;
    let requires_otp = state.turnstile.otp_required(&email).await?;
    Ok(Json(RequiresOtpResponse { requires_otp }))
}

async fn verify_otp_handler<R>(
    State(state): State<AuthState<R>>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let email = require(payload.email, "email")?;
    let code = require(payload.code, "code")?;
    state.turnstile.verify_otp(&email, &code).await?;
    Ok(Json(SuccessResponse { success: true }))
}

async fn login_failure_handler<R>(
    State(state): State<AuthState<R>>,
    Json(payload): Json<EmailRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let email = require(payload.email, "email")?;
    let status = state.turnstile.record_login_failure(&email).await?;
    Ok(Json(RequiresOtpResponse {
        requires_otp: status.requires_otp,
    }))
}

async fn login_success_handler<R>(
    State(state): State<AuthState<R>>,
    Json(payload): Json<EmailRequest>,
) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    let email = require(payload.email, "email")?;
    state.turnstile.record_login_success(&email).await?;
    Ok(Json(SuccessResponse { success: true }))
}

async fn health_handler<R>(State(state): State<AuthState<R>>) -> Result<impl IntoResponse>
where
    R: RepositoryProvider,
{
    state
        .turnstile
        .health_check()
        .await
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}
