//! Repository trait for the audit log.

use async_trait::async_trait;

use crate::{Error, audit::AuditEntry};

/// Append-only storage for audit events.
///
/// Deliberately narrow: there is no update and no delete. Anything that
/// needs to rewrite history is outside this subsystem.
#[async_trait]
pub trait AuditLogRepository: Send + Sync + 'static {
    /// Append one entry.
    async fn append(&self, entry: &AuditEntry) -> Result<(), Error>;

    /// Read the most recent entries, newest first, at most `limit`.
    async fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, Error>;
}
