//! Audit log entries
//!
//! Append-only records of privileged actions. Entries are never mutated or
//! deleted by this subsystem; the admin console reads them back newest-first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::UserId;

/// Well-known action names. Actions are free-form but namespaced strings;
/// these constants cover the ones this subsystem emits itself.
pub mod actions {
    pub const USER_CREATE: &str = "USER_CREATE";
    pub const ROLE_UPDATE: &str = "ROLE_UPDATE";
    pub const SUPER_ADMIN_CLAIM: &str = "SUPER_ADMIN_CLAIM";
}

/// One immutable audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub user_id: UserId,
    pub user_name: String,
    /// Namespaced action name, e.g. `"USER_CREATE"`.
    pub action: String,
    /// The kind of thing acted on, e.g. `"user"`, `"news_post"`.
    pub resource: String,
    pub resource_id: String,
    /// Optional structured before/after payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<serde_json::Value>,
}

impl AuditEntry {
    pub fn new(
        user_id: UserId,
        user_name: impl Into<String>,
        action: impl Into<String>,
        resource: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            user_id,
            user_name: user_name.into(),
            action: action.into(),
            resource: resource.into(),
            resource_id: resource_id.into(),
            changes: None,
        }
    }

    pub fn with_changes(mut self, changes: serde_json::Value) -> Self {
        self.changes = Some(changes);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_carries_changes_payload() {
        let entry = AuditEntry::new(
            UserId::new_random(),
            "Club Secretary",
            actions::ROLE_UPDATE,
            "user",
            "usr_target",
        )
        .with_changes(serde_json::json!({"role": {"from": "user", "to": "admin"}}));

        assert_eq!(entry.action, "ROLE_UPDATE");
        assert!(entry.changes.is_some());
        assert!(entry.timestamp <= Utc::now());
    }
}
