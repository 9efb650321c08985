use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use turnstile::{Identity, RepositoryProvider, Turnstile};

pub struct AuthState<R: RepositoryProvider> {
    pub turnstile: Arc<Turnstile<R>>,
}

impl<R: RepositoryProvider> Clone for AuthState<R> {
    fn clone(&self) -> Self {
        Self {
            turnstile: self.turnstile.clone(),
        }
    }
}

/// Admission middleware for the protected admin tree.
///
/// Expects the external auth provider integration to have inserted the
/// authenticated [`Identity`] as a request extension; an absent identity is
/// treated like an anonymous visitor, who can only reach the login page.
///
/// The guard runs on every request, never cached. Admitted requests carry
/// the [`turnstile::AccessDecision`] as an extension so handlers can check
/// individual permissions; denials become 303 redirects to the decision's
/// redirect path.
pub async fn admin_guard<R>(
    State(state): State<AuthState<R>>,
    mut request: Request,
    next: Next,
) -> Response
where
    R: RepositoryProvider,
{
    let route = request.uri().path().to_string();
    let identity = request
        .extensions()
        .get::<Identity>()
        .cloned()
        .unwrap_or_else(|| Identity::new(""));

    let decision = state.turnstile.authorize(&identity, &route).await;
    if decision.authorized {
        request.extensions_mut().insert(decision);
        return next.run(request).await;
    }

    tracing::debug!(route, "admission denied");
    let target = decision
        .redirect_to
        .as_deref()
        .unwrap_or("/admin/login")
        .to_string();
    Redirect::to(&target).into_response()
}
