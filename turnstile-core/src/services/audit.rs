//! Thin audit recorder.
//!
//! Builds entries, appends them through the repository, and mirrors the
//! event to `tracing`. Nothing here inspects or rewrites entries; the log is
//! append-only by interface.

use std::sync::Arc;

use crate::{
    Error,
    audit::AuditEntry,
    repositories::AuditLogRepository,
    user::UserProfile,
};

pub struct AuditService<A: AuditLogRepository> {
    repository: Arc<A>,
}

impl<A: AuditLogRepository> AuditService<A> {
    pub fn new(repository: Arc<A>) -> Self {
        Self { repository }
    }

    /// Record an action performed by `actor` on a resource.
    pub async fn record(
        &self,
        actor: &UserProfile,
        action: &str,
        resource: &str,
        resource_id: &str,
        changes: Option<serde_json::Value>,
    ) -> Result<(), Error> {
        let mut entry = AuditEntry::new(
            actor.id.clone(),
            actor.audit_name(),
            action,
            resource,
            resource_id,
        );
        if let Some(changes) = changes {
            entry = entry.with_changes(changes);
        }

        tracing::info!(
            action = entry.action,
            resource = entry.resource,
            resource_id = entry.resource_id,
            "audit event"
        );
        self.repository.append(&entry).await
    }

    /// The most recent entries, newest first.
    pub async fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, Error> {
        self.repository.recent(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::actions;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockAuditRepository {
        entries: Mutex<Vec<AuditEntry>>,
    }

    #[async_trait]
    impl AuditLogRepository for MockAuditRepository {
        async fn append(&self, entry: &AuditEntry) -> Result<(), Error> {
            self.entries.lock().unwrap().push(entry.clone());
            Ok(())
        }

        async fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, Error> {
            let entries = self.entries.lock().unwrap();
            Ok(entries.iter().rev().take(limit).cloned().collect())
        }
    }

    #[tokio::test]
    async fn test_record_and_read_back() {
        let repo = Arc::new(MockAuditRepository {
            entries: Mutex::new(Vec::new()),
        });
        let service = AuditService::new(repo.clone());
        let actor = UserProfile::builder()
            .email("secretary@club.example".to_string())
            .build()
            .unwrap();

        service
            .record(&actor, actions::USER_CREATE, "user", "usr_new", None)
            .await
            .unwrap();
        service
            .record(&actor, actions::ROLE_UPDATE, "user", "usr_new", None)
            .await
            .unwrap();

        let recent = service.recent(1).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].action, "ROLE_UPDATE");
        assert_eq!(recent[0].user_name, "secretary@club.example");
    }
}
