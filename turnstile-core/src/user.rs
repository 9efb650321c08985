//! User profiles and role assignments
//!
//! A profile is created on signup with role `user` and is never deleted by
//! this subsystem; the only mutation it performs is the role field, via the
//! privileged role-management action or the one-time super-admin bootstrap.
//! Identity tokens and sessions belong to the external authentication
//! provider; the profile only records who someone is and what they may do.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    error::ValidationError,
    id::{generate_prefixed_id, validate_prefixed_id},
    rbac::Role,
};

/// A unique, stable identifier for a specific user.
/// This value should be treated as opaque, even where it looks decodable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: &str) -> Self {
        UserId(id.to_string())
    }

    pub fn new_random() -> Self {
        UserId(generate_prefixed_id("usr"))
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this ID has the correct format for a user ID
    pub fn is_valid(&self) -> bool {
        validate_prefixed_id(&self.0, "usr")
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new_random()
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored user profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// The unique identifier for the user.
    pub id: UserId,

    /// Normalized email address.
    pub email: String,

    /// Display name shown in the admin console and audit log.
    pub display_name: Option<String>,

    /// The single role assigned to this user.
    pub role: Role,

    /// When the profile was created.
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn builder() -> UserProfileBuilder {
        UserProfileBuilder::default()
    }

    /// The name to record in audit entries: display name if set, else email.
    pub fn audit_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

#[derive(Default)]
pub struct UserProfileBuilder {
    id: Option<UserId>,
    email: Option<String>,
    display_name: Option<String>,
    role: Option<Role>,
    created_at: Option<DateTime<Utc>>,
}

impl UserProfileBuilder {
    pub fn id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn email(mut self, email: String) -> Self {
        self.email = Some(email);
        self
    }

    pub fn display_name(mut self, display_name: Option<String>) -> Self {
        self.display_name = display_name;
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn build(self) -> Result<UserProfile, Error> {
        Ok(UserProfile {
            id: self.id.unwrap_or_default(),
            email: self.email.ok_or(ValidationError::MissingField(
                "email".to_string(),
            ))?,
            display_name: self.display_name,
            role: self.role.unwrap_or(Role::User),
            created_at: self.created_at.unwrap_or_else(Utc::now),
        })
    }
}

/// Input for creating a profile. Role always starts as `user`; elevation is
/// a separate, audited action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProfile {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
}

impl NewProfile {
    pub fn new(email: String) -> Self {
        Self {
            id: UserId::new_random(),
            email,
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, display_name: String) -> Self {
        self.display_name = Some(display_name);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id() {
        let user_id = UserId::new("test");
        assert_eq!(user_id.as_str(), "test");

        let user_id_from_str = UserId::from(user_id.as_str());
        assert_eq!(user_id_from_str, user_id);

        let user_id_random = UserId::new_random();
        assert_ne!(user_id_random, user_id);
    }

    #[test]
    fn test_user_id_prefixed() {
        let user_id = UserId::new_random();
        assert!(user_id.as_str().starts_with("usr_"));
        assert!(user_id.is_valid());

        let invalid_id = UserId::new("invalid");
        assert!(!invalid_id.is_valid());
    }

    #[test]
    fn test_profile_defaults_to_user_role() {
        let profile = UserProfile::builder()
            .email("member@club.example".to_string())
            .build()
            .unwrap();
        assert_eq!(profile.role, Role::User);
        assert!(profile.id.is_valid());
    }

    #[test]
    fn test_profile_requires_email() {
        assert!(UserProfile::builder().build().is_err());
    }

    #[test]
    fn test_audit_name_prefers_display_name() {
        let mut profile = UserProfile::builder()
            .email("member@club.example".to_string())
            .build()
            .unwrap();
        assert_eq!(profile.audit_name(), "member@club.example");

        profile.display_name = Some("Sam Keeper".to_string());
        assert_eq!(profile.audit_name(), "Sam Keeper");
    }
}
