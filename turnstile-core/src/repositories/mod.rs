//! Repository traits for data access layer
//!
//! This module defines the repository interfaces that services use to reach
//! the credential store. These traits are the seam between the access-control
//! logic and whatever actually holds the documents: the hosted document
//! database in production, `turnstile-store-memory` in tests.
//!
//! # Trait Hierarchy
//!
//! - Individual `*Repository` traits define the operations for each data domain
//! - Individual `*RepositoryProvider` traits provide access to each repository type
//! - [`RepositoryProvider`] is a supertrait combining all provider traits plus
//!   a health check
//!
//! Adapters in [`adapter`] wrap an `Arc<RepositoryProvider>` back into the
//! individual repository traits so services can be handed a slice of a
//! provider.

pub mod adapter;
pub mod attempt;
pub mod audit;
pub mod user;

pub use adapter::{
    AuditLogRepositoryAdapter, LoginAttemptRepositoryAdapter, UserRepositoryAdapter,
};
pub use attempt::LoginAttemptRepository;
pub use audit::AuditLogRepository;
pub use user::UserRepository;

use async_trait::async_trait;

use crate::Error;

/// Provider trait for login-attempt repository access.
pub trait LoginAttemptRepositoryProvider: Send + Sync + 'static {
    /// The login-attempt repository implementation type
    type AttemptRepo: LoginAttemptRepository;

    /// Get the login-attempt repository
    fn login_attempts(&self) -> &Self::AttemptRepo;
}

/// Provider trait for user repository access.
pub trait UserRepositoryProvider: Send + Sync + 'static {
    /// The user repository implementation type
    type UserRepo: UserRepository;

    /// Get the user repository
    fn users(&self) -> &Self::UserRepo;
}

/// Provider trait for audit-log repository access.
pub trait AuditLogRepositoryProvider: Send + Sync + 'static {
    /// The audit-log repository implementation type
    type AuditRepo: AuditLogRepository;

    /// Get the audit-log repository
    fn audit_log(&self) -> &Self::AuditRepo;
}

/// Provider trait that storage implementations must implement to provide all
/// repositories.
///
/// There is no migration hook: the production credential store is a hosted
/// document database with no schema to run, and the in-memory provider needs
/// none either.
#[async_trait]
pub trait RepositoryProvider:
    LoginAttemptRepositoryProvider + UserRepositoryProvider + AuditLogRepositoryProvider
{
    /// Health check for all repositories
    async fn health_check(&self) -> Result<(), Error>;
}
