//! Core functionality for the turnstile project
//!
//! Turnstile is the admission-control subsystem of a sports-club website: it
//! tracks failed login attempts per email address, escalates to a one-time
//! passcode (OTP) challenge once failures cross a threshold, and decides who
//! may enter the protected admin console.
//!
//! The crate is organised the same way on every level:
//!
//! - domain types ([`LoginAttemptRecord`], [`UserProfile`], [`Role`],
//!   [`AuditEntry`]) carry the persisted state;
//! - [`repositories`] define the traits a storage backend must implement;
//! - [`services`] hold the business logic ([`services::LoginAttemptService`],
//!   [`services::AccessGuard`], [`services::AuditService`]).
//!
//! Primary credential checks and session issuance are owned by the external
//! authentication provider; this crate only stores the attempt record and the
//! profile role, and gates the admin area.

pub mod attempt;
pub mod audit;
pub mod crypto;
pub mod error;
pub mod id;
pub mod rbac;
pub mod repositories;
pub mod services;
pub mod user;
pub mod validation;

pub use attempt::{LoginAttemptRecord, OtpState};
pub use audit::AuditEntry;
pub use error::Error;
pub use rbac::{Permission, Role, has_permission, role_permissions};
pub use repositories::RepositoryProvider;
pub use user::{NewProfile, UserId, UserProfile};
pub use validation::normalize_email;
