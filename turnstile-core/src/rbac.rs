//! Role and permission model
//!
//! A static mapping from a small closed set of roles to the admin-console
//! actions they may perform. Read-only at runtime, no I/O: both enums are
//! closed, and the mapping is an exhaustive `match`, so every declared role
//! maps to some (possibly empty) permission set and an undeclared role is
//! unrepresentable. The only fallible edge is parsing a role string loaded
//! from the credential store.

use serde::{Deserialize, Serialize};

use crate::{Error, error::ValidationError};

/// The role stored on a user profile. Exactly one per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Default role assigned on signup. No admin-console access.
    User,
    /// Day-to-day club administration.
    Admin,
    /// Full access, including role management and site configuration.
    SuperAdmin,
}

impl Role {
    /// The string form used by the credential store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Parse a role string loaded from the credential store.
    ///
    /// An unrecognised string is a data error, not a panic: profiles are
    /// written by other deployments and the store is shared.
    pub fn parse(s: &str) -> Result<Self, Error> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            other => Err(ValidationError::UnknownRole(other.to_string()).into()),
        }
    }

    /// Whether this role admits its holder to the admin console at all.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action in the club's admin console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Create, edit and publish news posts.
    ManageNews,
    /// Maintain the fixture and result listings.
    ManageFixtures,
    /// Maintain the merchandise store.
    ManageStore,
    /// Manage club memberships.
    ManageMembers,
    /// Manage user accounts and role assignments.
    ManageUsers,
    /// Change site-wide settings and layout.
    ManageSite,
    /// Read the audit log.
    ViewAuditLog,
}

const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::ManageNews,
    Permission::ManageFixtures,
    Permission::ManageStore,
    Permission::ManageMembers,
    Permission::ViewAuditLog,
];

const SUPER_ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::ManageNews,
    Permission::ManageFixtures,
    Permission::ManageStore,
    Permission::ManageMembers,
    Permission::ManageUsers,
    Permission::ManageSite,
    Permission::ViewAuditLog,
];

/// The permission set for a role. Total over [`Role`] by construction.
pub fn role_permissions(role: Role) -> &'static [Permission] {
    match role {
        Role::User => &[],
        Role::Admin => ADMIN_PERMISSIONS,
        Role::SuperAdmin => SUPER_ADMIN_PERMISSIONS,
    }
}

/// Membership test on the role's permission set.
pub fn has_permission(role: Role, permission: Permission) -> bool {
    role_permissions(role).contains(&permission)
}
