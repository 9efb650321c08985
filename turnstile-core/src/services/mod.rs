//! Service layer for business logic
//!
//! This module contains concrete service implementations that encapsulate
//! the access-control logic: failure tracking and passcode escalation,
//! admin-console admission, audit recording, and profile management.

pub mod access_guard;
pub mod audit;
pub mod login_attempt;
pub mod mailer;
pub mod user;

pub use access_guard::{AccessDecision, AccessGuard, GuardConfig, Identity};
pub use audit::AuditService;
pub use login_attempt::{FailureStatus, LoginAttemptService, PasscodePolicy};
pub use mailer::PasscodeMailer;
pub use user::UserService;

#[cfg(feature = "mailer")]
pub use mailer::PasscodeMailerService;
