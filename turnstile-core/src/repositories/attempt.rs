//! Repository trait for login-attempt records.

use async_trait::async_trait;

use crate::{Error, attempt::LoginAttemptRecord};

/// Storage for per-email login-attempt documents.
///
/// Records are addressed by the hex SHA-256 of the normalized email address
/// ([`crate::crypto::email_key`]), never by the raw address. Concurrent
/// writers for the same address race on the same document; the store's
/// last-writer-wins merge is accepted rather than imposing application-level
/// locking, so callers must treat these operations as idempotent-safe but
/// not strictly serializable.
///
/// # Security Considerations
///
/// - Records are written for all email addresses, existing accounts or not,
///   to avoid user enumeration through differing behaviour.
/// - The raw (normalized) address lives inside the document for operational
///   lookup only; it must never become a key or an index.
#[async_trait]
pub trait LoginAttemptRepository: Send + Sync + 'static {
    /// Fetch the record stored under `email_key`, if any.
    async fn get(&self, email_key: &str) -> Result<Option<LoginAttemptRecord>, Error>;

    /// Write the record under its own key, creating or replacing the whole
    /// document. The record is the unit of merge; unspecified concurrency is
    /// last-writer-wins.
    async fn upsert(&self, record: &LoginAttemptRecord) -> Result<(), Error>;

    /// Remove the record stored under `email_key`. Missing records are not
    /// an error.
    async fn delete(&self, email_key: &str) -> Result<(), Error>;
}
