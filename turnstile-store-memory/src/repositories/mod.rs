//! Repository implementations over `dashmap`.

mod attempt;
mod audit;
mod user;

pub use attempt::MemoryLoginAttemptRepository;
pub use audit::MemoryAuditLogRepository;
pub use user::MemoryUserRepository;

use async_trait::async_trait;
use turnstile_core::{
    Error,
    repositories::{
        AuditLogRepositoryProvider, LoginAttemptRepositoryProvider, RepositoryProvider,
        UserRepositoryProvider,
    },
};

/// All three repositories in one in-process provider.
#[derive(Default)]
pub struct MemoryRepositoryProvider {
    attempts: MemoryLoginAttemptRepository,
    users: MemoryUserRepository,
    audit: MemoryAuditLogRepository,
}

impl MemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LoginAttemptRepositoryProvider for MemoryRepositoryProvider {
    type AttemptRepo = MemoryLoginAttemptRepository;

    fn login_attempts(&self) -> &Self::AttemptRepo {
        &self.attempts
    }
}

impl UserRepositoryProvider for MemoryRepositoryProvider {
    type UserRepo = MemoryUserRepository;

    fn users(&self) -> &Self::UserRepo {
        &self.users
    }
}

impl AuditLogRepositoryProvider for MemoryRepositoryProvider {
    type AuditRepo = MemoryAuditLogRepository;

    fn audit_log(&self) -> &Self::AuditRepo {
        &self.audit
    }
}

#[async_trait]
impl RepositoryProvider for MemoryRepositoryProvider {
    async fn health_check(&self) -> Result<(), Error> {
        Ok(())
    }
}
