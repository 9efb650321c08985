//! Repository trait for user profiles.

use async_trait::async_trait;

use crate::{
    Error,
    rbac::Role,
    user::{NewProfile, UserId, UserProfile},
};

/// Storage for user profiles and their role assignments.
///
/// Profiles are created with role `user` and never deleted by this
/// subsystem. The only field it ever mutates is `role`.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Create a profile. The stored role is always [`Role::User`].
    async fn create(&self, profile: &NewProfile) -> Result<UserProfile, Error>;

    /// Fetch a profile by id.
    async fn get(&self, id: &UserId) -> Result<Option<UserProfile>, Error>;

    /// Fetch a profile by normalized email address.
    async fn get_by_email(&self, email: &str) -> Result<Option<UserProfile>, Error>;

    /// Set the role on an existing profile.
    async fn set_role(&self, id: &UserId, role: Role) -> Result<(), Error>;

    /// Whether any profile currently holds [`Role::SuperAdmin`]. Gates the
    /// one-time bootstrap claim.
    async fn any_super_admin(&self) -> Result<bool, Error>;
}
