//! Profile management: signup, role changes, and the super-admin bootstrap.
//!
//! Every mutation here is privileged or one-time and goes through the audit
//! recorder. Ordinary reads go straight to the repository.

use std::sync::Arc;

use crate::{
    Error,
    audit::actions,
    error::AuthError,
    rbac::{Permission, Role, has_permission},
    repositories::{AuditLogRepository, UserRepository},
    services::audit::AuditService,
    user::{NewProfile, UserId, UserProfile},
    validation::normalize_email,
};

pub struct UserService<U: UserRepository, A: AuditLogRepository> {
    users: Arc<U>,
    audit: AuditService<A>,
}

impl<U: UserRepository, A: AuditLogRepository> UserService<U, A> {
    pub fn new(users: Arc<U>, audit_repository: Arc<A>) -> Self {
        Self {
            users,
            audit: AuditService::new(audit_repository),
        }
    }

    pub async fn get(&self, id: &UserId) -> Result<Option<UserProfile>, Error> {
        self.users.get(id).await
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<UserProfile>, Error> {
        let email = normalize_email(email)?;
        self.users.get_by_email(&email).await
    }

    /// The signup path: fetch the profile for an address, creating it with
    /// role `user` when absent. Creation is audited as `USER_CREATE` with
    /// the new profile as its own actor.
    pub async fn get_or_create(&self, email: &str) -> Result<UserProfile, Error> {
        let email = normalize_email(email)?;
        if let Some(profile) = self.users.get_by_email(&email).await? {
            return Ok(profile);
        }

        let profile = self.users.create(&NewProfile::new(email)).await?;
        self.audit
            .record(
                &profile,
                actions::USER_CREATE,
                "user",
                profile.id.as_str(),
                None,
            )
            .await?;
        Ok(profile)
    }

    /// Privileged role change. The actor must hold `ManageUsers`; the change
    /// is audited with a before/after payload.
    pub async fn set_role(
        &self,
        actor: &UserProfile,
        target: &UserId,
        role: Role,
    ) -> Result<UserProfile, Error> {
        if !has_permission(actor.role, Permission::ManageUsers) {
            return Err(AuthError::PermissionDenied.into());
        }

        let mut profile = self
            .users
            .get(target)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        let previous = profile.role;
        self.users.set_role(target, role).await?;
        profile.role = role;

        self.audit
            .record(
                actor,
                actions::ROLE_UPDATE,
                "user",
                target.as_str(),
                Some(serde_json::json!({
                    "role": { "from": previous.as_str(), "to": role.as_str() }
                })),
            )
            .await?;
        Ok(profile)
    }

    /// One-time bootstrap: the first claimant becomes super admin. Closed
    /// forever once any profile holds the role.
    pub async fn claim_super_admin(&self, claimant: &UserId) -> Result<UserProfile, Error> {
        if self.users.any_super_admin().await? {
            return Err(AuthError::BootstrapClosed.into());
        }

        let mut profile = self
            .users
            .get(claimant)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        self.users.set_role(claimant, Role::SuperAdmin).await?;
        profile.role = Role::SuperAdmin;

        self.audit
            .record(
                &profile,
                actions::SUPER_ADMIN_CLAIM,
                "user",
                claimant.as_str(),
                None,
            )
            .await?;
        Ok(profile)
    }
}
