//! Adapters that wrap a [`RepositoryProvider`] and implement the individual
//! repository traits, so services that want one repository can be handed a
//! slice of a shared provider.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    Error,
    attempt::LoginAttemptRecord,
    audit::AuditEntry,
    rbac::Role,
    repositories::{
        AuditLogRepository, AuditLogRepositoryProvider, LoginAttemptRepository,
        LoginAttemptRepositoryProvider, RepositoryProvider, UserRepository,
        UserRepositoryProvider,
    },
    user::{NewProfile, UserId, UserProfile},
};

pub struct LoginAttemptRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> LoginAttemptRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> LoginAttemptRepository for LoginAttemptRepositoryAdapter<R> {
    async fn get(&self, email_key: &str) -> Result<Option<LoginAttemptRecord>, Error> {
        self.provider.login_attempts().get(email_key).await
    }

    async fn upsert(&self, record: &LoginAttemptRecord) -> Result<(), Error> {
        self.provider.login_attempts().upsert(record).await
    }

    async fn delete(&self, email_key: &str) -> Result<(), Error> {
        self.provider.login_attempts().delete(email_key).await
    }
}

pub struct UserRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> UserRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> UserRepository for UserRepositoryAdapter<R> {
    async fn create(&self, profile: &NewProfile) -> Result<UserProfile, Error> {
        self.provider.users().create(profile).await
    }

    async fn get(&self, id: &UserId) -> Result<Option<UserProfile>, Error> {
        self.provider.users().get(id).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<UserProfile>, Error> {
        self.provider.users().get_by_email(email).await
    }

    async fn set_role(&self, id: &UserId, role: Role) -> Result<(), Error> {
        self.provider.users().set_role(id, role).await
    }

    async fn any_super_admin(&self) -> Result<bool, Error> {
        self.provider.users().any_super_admin().await
    }
}

pub struct AuditLogRepositoryAdapter<R: RepositoryProvider> {
    provider: Arc<R>,
}

impl<R: RepositoryProvider> AuditLogRepositoryAdapter<R> {
    pub fn new(provider: Arc<R>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<R: RepositoryProvider> AuditLogRepository for AuditLogRepositoryAdapter<R> {
    async fn append(&self, entry: &AuditEntry) -> Result<(), Error> {
        self.provider.audit_log().append(entry).await
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, Error> {
        self.provider.audit_log().recent(limit).await
    }
}
