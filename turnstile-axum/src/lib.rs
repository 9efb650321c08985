//! # Turnstile Axum Integration
//!
//! This crate provides Axum routes and middleware for the Turnstile
//! admission-control subsystem:
//!
//! - **Tracker routes**: failed-login reporting and the one-time-passcode
//!   challenge, mounted by [`create_router`];
//! - **Admission middleware**: [`admin_guard`] runs the access guard on
//!   every request into the protected admin tree and turns denials into
//!   303 redirects.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum::{Router, routing::get};
//! use turnstile::Turnstile;
//! use turnstile_axum::{AuthState, admin_guard, create_router};
//! use turnstile_store_memory::MemoryRepositoryProvider;
//!
//! #[tokio::main]
//! async fn main() {
//!     let repositories = Arc::new(MemoryRepositoryProvider::new());
//!     let turnstile = Arc::new(Turnstile::new(repositories));
//!
//!     let state = AuthState {
//!         turnstile: turnstile.clone(),
//!     };
//!     let app = Router::new()
//!         .nest("/auth", create_router(turnstile))
//!         .route("/admin", get(admin_dashboard))
//!         .layer(axum::middleware::from_fn_with_state(
//!             state,
//!             admin_guard::<MemoryRepositoryProvider>,
//!         ));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//!
//! async fn admin_dashboard() -> &'static str {
//!     "Only admitted roles get here."
//! }
//! ```

mod error;
mod middleware;
mod routes;
mod types;

pub use error::{ApiError, Result};
pub use middleware::{AuthState, admin_guard};
pub use routes::create_router;
pub use types::{
    EmailQuery, EmailRequest, HealthResponse, RequiresOtpResponse, SuccessResponse,
    VerifyOtpRequest,
};
