//! Admission decisions for the protected admin area.
//!
//! The guard composes the authenticated identity, the stored role and a
//! static super-admin allow-list into a single [`AccessDecision`]. It is
//! evaluated on every navigation into the protected area and never cached
//! beyond the current identity.
//!
//! The allow-list is a resilience fast path: membership is a pure string
//! comparison that cannot fail, so allow-listed owners can still reach the
//! console while the credential store is unreachable. Store failures never
//! propagate out of the guard; they degrade to the allow-list fallback and a
//! redirect.

use std::sync::Arc;

use crate::{
    rbac::{Permission, Role, role_permissions},
    repositories::UserRepository,
    user::UserId,
    validation::normalize_email_lossy,
};

/// Configuration for the guard. Injected, never hardcoded, so tests can swap
/// the allow-list and paths freely.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Emails granted super-admin regardless of stored role. Normalized at
    /// construction.
    allow_list: Vec<String>,
    /// Local development escape hatch. Must never be set in production.
    pub dev_bypass: bool,
    /// The public admin login page, always admitted.
    pub login_path: String,
    /// Where non-privileged users are sent.
    pub member_path: String,
}

impl GuardConfig {
    pub fn new(allow_list: impl IntoIterator<Item = String>) -> Self {
        Self {
            allow_list: allow_list
                .into_iter()
                .map(|e| normalize_email_lossy(&e))
                .filter(|e| !e.is_empty())
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_dev_bypass(mut self, dev_bypass: bool) -> Self {
        self.dev_bypass = dev_bypass;
        self
    }

    fn allows(&self, normalized_email: &str) -> bool {
        !normalized_email.is_empty()
            && self.allow_list.iter().any(|e| e == normalized_email)
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            allow_list: Vec::new(),
            dev_bypass: false,
            login_path: "/admin/login".to_string(),
            member_path: "/members".to_string(),
        }
    }
}

/// The authenticated identity as reported by the external auth provider.
/// The id is optional because allow-listed owners may authenticate before a
/// profile exists for them.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Option<UserId>,
    pub email: String,
}

impl Identity {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: None,
            email: email.into(),
        }
    }
}

/// The outcome of an admission check.
#[derive(Debug, Clone)]
pub struct AccessDecision {
    pub authorized: bool,
    /// The effective role, where one was resolved. The public login page
    /// and denials carry none.
    pub role: Option<Role>,
    /// Permissions derived from the effective role.
    pub permissions: &'static [Permission],
    /// Where to send a denied visitor.
    pub redirect_to: Option<String>,
}

impl AccessDecision {
    fn admitted(role: Role) -> Self {
        Self {
            authorized: true,
            role: Some(role),
            permissions: role_permissions(role),
            redirect_to: None,
        }
    }

    /// Admission without a resolved role (the public login page).
    fn public() -> Self {
        Self {
            authorized: true,
            role: None,
            permissions: &[],
            redirect_to: None,
        }
    }

    fn denied(redirect_to: String) -> Self {
        Self {
            authorized: false,
            role: None,
            permissions: &[],
            redirect_to: Some(redirect_to),
        }
    }

    /// Permission check against the resolved role. False whenever no role
    /// was resolved.
    pub fn can(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn can_all(&self, permissions: &[Permission]) -> bool {
        permissions.iter().all(|p| self.can(*p))
    }

    pub fn can_any(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.can(*p))
    }
}

/// Service deciding admission to the admin console.
pub struct AccessGuard<U: UserRepository> {
    users: Arc<U>,
    config: GuardConfig,
}

impl<U: UserRepository> AccessGuard<U> {
    pub fn new(users: Arc<U>, config: GuardConfig) -> Self {
        Self { users, config }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Decide whether `identity` may enter `route`.
    ///
    /// Ordered, first match wins:
    /// 1. the public admin login page is always admitted;
    /// 2. the local dev bypass admits immediately;
    /// 3. allow-list membership admits with full super-admin permissions,
    ///    without touching the store;
    /// 4. otherwise the stored role decides: `admin`/`super_admin` are
    ///    admitted, everyone else is sent to the member area;
    /// 5. a store failure falls back to the allow-list check before
    ///    redirecting to the login page.
    ///
    /// Infallible by design: every failure path resolves to a denial with a
    /// redirect rather than an error.
    pub async fn authorize(&self, identity: &Identity, route: &str) -> AccessDecision {
        if route == self.config.login_path {
            return AccessDecision::public();
        }

        if self.config.dev_bypass {
            tracing::warn!("dev bypass active, admitting without checks");
            return AccessDecision::admitted(Role::SuperAdmin);
        }

        let email = normalize_email_lossy(&identity.email);
        if self.config.allows(&email) {
            return AccessDecision::admitted(Role::SuperAdmin);
        }

        match self.users.get_by_email(&email).await {
            Ok(Some(profile)) if profile.role.is_admin() => {
                AccessDecision::admitted(profile.role)
            }
            Ok(_) => AccessDecision::denied(self.config.member_path.clone()),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "credential store unavailable, falling back to allow-list"
                );
                if self.config.allows(&email) {
                    AccessDecision::admitted(Role::SuperAdmin)
                } else {
                    AccessDecision::denied(self.config.login_path.clone())
                }
            }
        }
    }
}
