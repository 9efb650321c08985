use std::sync::Mutex;

use async_trait::async_trait;
use turnstile_core::{AuditEntry, Error, repositories::AuditLogRepository};

/// Append-only audit log held in order of arrival.
#[derive(Default)]
pub struct MemoryAuditLogRepository {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditLogRepository for MemoryAuditLogRepository {
    async fn append(&self, entry: &AuditEntry) -> Result<(), Error> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, Error> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.iter().rev().take(limit).cloned().collect())
    }
}
