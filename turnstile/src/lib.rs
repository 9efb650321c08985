//! # Turnstile
//!
//! Turnstile is the admission-control subsystem of a sports-club website. It
//! tracks failed login attempts per email address, escalates to an emailed
//! one-time passcode once failures cross a threshold, and decides who may
//! enter the protected admin console based on stored roles and a static
//! super-admin allow-list.
//!
//! The primary credential check and session issuance belong to the external
//! authentication provider; Turnstile sits beside it and owns:
//!
//! - the per-address failure counter and passcode lifecycle
//!   (issue, resend cooldown, verify, lazy expiry, verified window);
//! - admission decisions for the admin area, resilient to the credential
//!   store being down;
//! - profile roles, the one-time super-admin bootstrap, and the audit trail
//!   of privileged changes.
//!
//! ## Example
//!
//! ```rust,no_run
//! use turnstile::Turnstile;
//! use turnstile_store_memory::MemoryRepositoryProvider;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let repositories = Arc::new(MemoryRepositoryProvider::new());
//!     let turnstile = Turnstile::new(repositories);
//!
//!     let status = turnstile
//!         .record_login_failure("fan@club.example")
//!         .await
//!         .unwrap();
//!     if status.requires_otp {
//!         // Present the passcode challenge before the next attempt.
//!     }
//! }
//! ```

use std::sync::Arc;

use turnstile_core::{
    repositories::{
        AuditLogRepositoryAdapter, LoginAttemptRepositoryAdapter, UserRepositoryAdapter,
    },
    services::{
        AccessGuard, AuditService, LoginAttemptService, PasscodeMailer, UserService,
    },
};

/// Re-export core types from turnstile_core
///
/// These types are commonly used when working with the Turnstile API.
pub use turnstile_core::{
    AuditEntry, LoginAttemptRecord, OtpState, Permission, RepositoryProvider, Role, UserId,
    UserProfile,
    error::{AuthError, ValidationError},
    services::{AccessDecision, FailureStatus, GuardConfig, Identity, PasscodePolicy},
};

#[cfg(feature = "mailer")]
pub use turnstile_core::services::PasscodeMailerService;

use turnstile_core::Error;

/// Errors that can occur when using Turnstile.
///
/// Storage and mail failures are flattened to their message; the auth and
/// validation variants keep their structure because the HTTP boundary maps
/// them to distinct status codes.
#[derive(Debug, thiserror::Error)]
pub enum TurnstileError {
    /// Error in the passcode or admission flow
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
    /// Rejected input, before any storage access
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    /// Error when interacting with the credential store
    #[error("Storage error: {0}")]
    Storage(String),
    /// Error when dispatching a passcode email
    #[error("Mail error: {0}")]
    Mail(String),
}

impl From<Error> for TurnstileError {
    fn from(err: Error) -> Self {
        match err {
            Error::Auth(e) => Self::Auth(e),
            Error::Validation(e) => Self::Validation(e),
            Error::Storage(e) => Self::Storage(e.to_string()),
            Error::Mail(e) => Self::Mail(e.to_string()),
        }
    }
}

impl TurnstileError {
    /// True for the resend-cooldown rejection (HTTP 429).
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Auth(AuthError::RateLimited))
    }

    /// True for caller mistakes (HTTP 400): bad input, or a passcode that is
    /// missing, expired or wrong.
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::Auth(
                    AuthError::OtpNotFound | AuthError::OtpExpired | AuthError::InvalidCode
                )
        )
    }
}

/// The admission-control coordinator that wires the services to one
/// repository provider.
///
/// `Turnstile` is the single entry point an application needs: construct it
/// from an `Arc` of any [`RepositoryProvider`] implementation, optionally
/// adjust the [`PasscodePolicy`] and [`GuardConfig`], attach a mailer, and
/// call the flow methods.
pub struct Turnstile<R: RepositoryProvider> {
    repositories: Arc<R>,
    attempt_service: LoginAttemptService<LoginAttemptRepositoryAdapter<R>>,
    access_guard: AccessGuard<UserRepositoryAdapter<R>>,
    user_service: UserService<UserRepositoryAdapter<R>, AuditLogRepositoryAdapter<R>>,
    audit_service: AuditService<AuditLogRepositoryAdapter<R>>,
    mailer: Option<Arc<dyn PasscodeMailer>>,
}

impl<R: RepositoryProvider> Turnstile<R> {
    /// Create a new Turnstile instance with a repository provider, the
    /// default [`PasscodePolicy`] and an empty [`GuardConfig`].
    pub fn new(repositories: Arc<R>) -> Self {
        let attempt_repo = Arc::new(LoginAttemptRepositoryAdapter::new(repositories.clone()));
        let user_repo = Arc::new(UserRepositoryAdapter::new(repositories.clone()));
        let audit_repo = Arc::new(AuditLogRepositoryAdapter::new(repositories.clone()));

        Self {
            repositories: repositories.clone(),
            attempt_service: LoginAttemptService::new(attempt_repo, PasscodePolicy::default()),
            access_guard: AccessGuard::new(user_repo.clone(), GuardConfig::default()),
            user_service: UserService::new(user_repo, audit_repo.clone()),
            audit_service: AuditService::new(audit_repo),
            mailer: None,
        }
    }

    /// Replace the passcode policy (thresholds, cooldowns, windows).
    pub fn with_policy(mut self, policy: PasscodePolicy) -> Self {
        let attempt_repo = Arc::new(LoginAttemptRepositoryAdapter::new(self.repositories.clone()));
        self.attempt_service = LoginAttemptService::new(attempt_repo, policy);
        self
    }

    /// Replace the guard configuration (allow-list, paths, dev bypass).
    pub fn with_guard_config(mut self, config: GuardConfig) -> Self {
        let user_repo = Arc::new(UserRepositoryAdapter::new(self.repositories.clone()));
        self.access_guard = AccessGuard::new(user_repo, config);
        self
    }

    /// Attach the mailer used to dispatch passcodes. Without one,
    /// [`Turnstile::request_otp`] fails.
    pub fn with_mailer(mut self, mailer: Arc<dyn PasscodeMailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    /// Record one failed login attempt for an address.
    ///
    /// Returns the updated failure count and whether the passcode challenge
    /// is now required.
    pub async fn record_login_failure(
        &self,
        email: &str,
    ) -> Result<FailureStatus, TurnstileError> {
        Ok(self.attempt_service.record_failure(email).await?)
    }

    /// Reset an address after a successful login. Idempotent.
    pub async fn record_login_success(&self, email: &str) -> Result<(), TurnstileError> {
        Ok(self.attempt_service.record_success(email).await?)
    }

    /// Whether the passcode challenge must be presented for this address.
    pub async fn otp_required(&self, email: &str) -> Result<bool, TurnstileError> {
        Ok(self.attempt_service.otp_required(email).await?)
    }

    /// Issue a passcode and email it to the address.
    ///
    /// Fails with a rate-limit error during the resend cooldown, and with a
    /// mail error when no mailer was attached.
    pub async fn request_otp(&self, email: &str) -> Result<(), TurnstileError> {
        let mailer = self
            .mailer
            .as_deref()
            .ok_or_else(|| TurnstileError::Mail("no mailer configured".to_string()))?;
        Ok(self.attempt_service.request_otp(email, mailer).await?)
    }

    /// Verify a submitted passcode, opening the verified window on success.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<(), TurnstileError> {
        Ok(self.attempt_service.verify_otp(email, code).await?)
    }

    /// Decide whether `identity` may enter `route` in the admin area.
    ///
    /// Infallible: store failures degrade to the allow-list fallback and a
    /// redirect, never an error.
    pub async fn authorize(&self, identity: &Identity, route: &str) -> AccessDecision {
        self.access_guard.authorize(identity, route).await
    }

    /// Fetch the profile for an address, creating it with role `user` when
    /// absent.
    pub async fn get_or_create_user(&self, email: &str) -> Result<UserProfile, TurnstileError> {
        Ok(self.user_service.get_or_create(email).await?)
    }

    /// Get a user by their id
    pub async fn get_user(&self, id: &UserId) -> Result<Option<UserProfile>, TurnstileError> {
        Ok(self.user_service.get(id).await?)
    }

    /// Privileged role change; the actor must hold
    /// [`Permission::ManageUsers`].
    pub async fn set_role(
        &self,
        actor: &UserProfile,
        target: &UserId,
        role: Role,
    ) -> Result<UserProfile, TurnstileError> {
        Ok(self.user_service.set_role(actor, target, role).await?)
    }

    /// One-time bootstrap: the first claimant becomes super admin.
    pub async fn claim_super_admin(
        &self,
        claimant: &UserId,
    ) -> Result<UserProfile, TurnstileError> {
        Ok(self.user_service.claim_super_admin(claimant).await?)
    }

    /// The most recent audit entries, newest first.
    pub async fn recent_audit_entries(
        &self,
        limit: usize,
    ) -> Result<Vec<AuditEntry>, TurnstileError> {
        Ok(self.audit_service.recent(limit).await?)
    }

    /// Check the health of the underlying repositories.
    pub async fn health_check(&self) -> Result<(), TurnstileError> {
        Ok(self.repositories.health_check().await?)
    }
}
