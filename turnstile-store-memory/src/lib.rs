//! In-process storage for turnstile.
//!
//! The production deployment keeps attempt records, profiles and the audit
//! log in a hosted document database; this crate provides the same
//! repository surface over `dashmap` so tests, demos and the local dev loop
//! need no network at all. Semantics intentionally match the document
//! store's: upserts are whole-document, last-writer-wins.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use turnstile_store_memory::MemoryRepositoryProvider;
//!
//! let repositories = Arc::new(MemoryRepositoryProvider::new());
//! let turnstile = turnstile::Turnstile::new(repositories);
//! ```

pub mod repositories;

pub use repositories::{
    MemoryAuditLogRepository, MemoryLoginAttemptRepository, MemoryRepositoryProvider,
    MemoryUserRepository,
};
