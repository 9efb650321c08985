//! Login-attempt tracking and passcode escalation.
//!
//! This service records authentication failures per email address, decides
//! when the secondary passcode challenge is required, and manages the
//! passcode lifecycle (issue, resend cooldown, verify, lazy expiry).
//!
//! Verification state is deliberately decoupled from failure state: passing
//! the passcode challenge opens a bounded [`OtpState::Verified`] window but
//! never decrements the failure count; only a subsequent successful primary
//! authentication does. The primary credential check still governs session
//! issuance; the passcode only removes the secondary gate for a while.
//!
//! # Example
//!
//! ```rust,ignore
//! use turnstile_core::services::{LoginAttemptService, PasscodePolicy};
//!
//! let service = LoginAttemptService::new(repository, PasscodePolicy::default());
//!
//! // After the credential check fails:
//! let status = service.record_failure("fan@club.example").await?;
//! if status.requires_otp {
//!     service.request_otp("fan@club.example", &mailer).await?;
//! }
//! ```

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::{
    Error,
    attempt::{LoginAttemptRecord, OtpState},
    crypto::{generate_passcode, hash_passcode, verify_passcode},
    error::AuthError,
    repositories::LoginAttemptRepository,
    services::mailer::PasscodeMailer,
    validation::normalize_email,
};

/// Tuning for the escalation flow. All values injectable; the defaults match
/// production.
#[derive(Debug, Clone)]
pub struct PasscodePolicy {
    /// Consecutive failures before the passcode challenge is required.
    pub threshold: u32,
    /// Minimum gap between two passcode dispatches for one address.
    pub resend_cooldown: Duration,
    /// How long an issued passcode stays verifiable.
    pub code_expiry: Duration,
    /// How long a successful verification waives the challenge.
    pub verified_window: Duration,
    /// Number of digits in a passcode.
    pub code_length: usize,
}

impl Default for PasscodePolicy {
    fn default() -> Self {
        Self {
            threshold: 5,
            resend_cooldown: Duration::seconds(60),
            code_expiry: Duration::minutes(10),
            verified_window: Duration::minutes(10),
            code_length: 6,
        }
    }
}

/// Result of recording a failure: the updated count and whether the caller
/// should now present the passcode challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureStatus {
    pub fail_count: u32,
    pub requires_otp: bool,
}

/// Service for managing the per-email failure counter and passcode lifecycle.
///
/// Thread-safe; the repository handles concurrent access. Operations on the
/// same address race on one document with last-writer-wins semantics, so the
/// resend cooldown is a soft rate limit, not a serializable guarantee.
pub struct LoginAttemptService<R: LoginAttemptRepository> {
    repository: Arc<R>,
    policy: PasscodePolicy,
}

impl<R: LoginAttemptRepository> LoginAttemptService<R> {
    pub fn new(repository: Arc<R>, policy: PasscodePolicy) -> Self {
        Self { repository, policy }
    }

    pub fn policy(&self) -> &PasscodePolicy {
        &self.policy
    }

    /// Record one authentication failure for an address.
    ///
    /// Loads or creates the record, increments the counter, stamps the
    /// failure time and persists the document. The returned status says
    /// whether the challenge is now required (threshold reached and no open
    /// verification window).
    pub async fn record_failure(&self, email: &str) -> Result<FailureStatus, Error> {
        let email = normalize_email(email)?;
        let now = Utc::now();

        let mut record = self.load_or_new(&email).await?;
        record.record_failure(now);
        let requires_otp = record.requires_otp(self.policy.threshold, now);
        self.repository.upsert(&record).await?;

        tracing::debug!(
            fail_count = record.fail_count,
            requires_otp,
            "recorded failed login attempt"
        );

        Ok(FailureStatus {
            fail_count: record.fail_count,
            requires_otp,
        })
    }

    /// Reset an address after a successful primary authentication.
    ///
    /// Clears the failure count and any open verification window. Idempotent;
    /// an address with no record is a no-op.
    pub async fn record_success(&self, email: &str) -> Result<(), Error> {
        let email = normalize_email(email)?;
        let key = crate::crypto::email_key(&email);

        if let Some(mut record) = self.repository.get(&key).await? {
            record.record_success();
            self.repository.upsert(&record).await?;
        }
        Ok(())
    }

    /// Whether the passcode challenge must be presented for this address.
    ///
    /// An address with no record has no prior failures and needs none.
    pub async fn otp_required(&self, email: &str) -> Result<bool, Error> {
        let email = normalize_email(email)?;
        let key = crate::crypto::email_key(&email);
        let now = Utc::now();

        match self.repository.get(&key).await? {
            Some(record) => Ok(record.requires_otp(self.policy.threshold, now)),
            None => Ok(false),
        }
    }

    /// Issue a passcode and dispatch it to the address.
    ///
    /// Fails with [`AuthError::RateLimited`] while a passcode sent less than
    /// the resend cooldown ago is still pending. Otherwise a fresh code
    /// overwrites any previous one, the record is persisted (hash only), and
    /// the plaintext goes to the mailer and nowhere else.
    pub async fn request_otp<M>(&self, email: &str, mailer: &M) -> Result<(), Error>
    where
        M: PasscodeMailer + ?Sized,
    {
        let email = normalize_email(email)?;
        let now = Utc::now();

        let mut record = self.load_or_new(&email).await?;
        if let OtpState::Pending { sent_at, .. } = &record.otp {
            if now - *sent_at < self.policy.resend_cooldown {
                return Err(AuthError::RateLimited.into());
            }
        }

        let code = generate_passcode(self.policy.code_length);
        record.otp = OtpState::Pending {
            code_hash: hash_passcode(&code),
            sent_at: now,
            expires_at: now + self.policy.code_expiry,
        };
        self.repository.upsert(&record).await?;

        mailer.send_passcode(&record.email, &code).await?;
        tracing::info!("dispatched one-time passcode");
        Ok(())
    }

    /// Verify a submitted passcode.
    ///
    /// - [`AuthError::OtpNotFound`] when no record exists for the address.
    /// - [`AuthError::OtpExpired`] when nothing is pending or the pending
    ///   code is past its deadline; a code found expired here is cleared and
    ///   the cleared record persisted (expiry is discovered lazily, there is
    ///   no background sweep).
    /// - [`AuthError::InvalidCode`] on hash mismatch.
    ///
    /// Success opens the verification window and clears the code, so a
    /// second submission of the same code fails. The failure count is not
    /// touched.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<(), Error> {
        let email = normalize_email(email)?;
        let key = crate::crypto::email_key(&email);
        let now = Utc::now();

        let mut record = self
            .repository
            .get(&key)
            .await?
            .ok_or(AuthError::OtpNotFound)?;

        match record.otp.clone() {
            OtpState::Pending {
                code_hash,
                expires_at,
                ..
            } => {
                if expires_at <= now {
                    record.otp = OtpState::None;
                    self.repository.upsert(&record).await?;
                    return Err(AuthError::OtpExpired.into());
                }
                if !verify_passcode(code, &code_hash) {
                    return Err(AuthError::InvalidCode.into());
                }
                record.otp = OtpState::Verified {
                    until: now + self.policy.verified_window,
                };
                self.repository.upsert(&record).await?;
                tracing::info!("passcode verified, challenge waived for the window");
                Ok(())
            }
            // No code outstanding: either never requested, already consumed,
            // or collapsed by an earlier expiry check.
            OtpState::None | OtpState::Verified { .. } => Err(AuthError::OtpExpired.into()),
        }
    }

    async fn load_or_new(&self, normalized_email: &str) -> Result<LoginAttemptRecord, Error> {
        let key = crate::crypto::email_key(normalized_email);
        Ok(self
            .repository
            .get(&key)
            .await?
            .unwrap_or_else(|| LoginAttemptRecord::new(normalized_email.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::DateTime;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock repository for testing
    struct MockAttemptRepository {
        records: Mutex<HashMap<String, LoginAttemptRecord>>,
    }

    impl MockAttemptRepository {
        fn new() -> Self {
            Self {
                records: Mutex::new(HashMap::new()),
            }
        }

        fn seed(&self, record: LoginAttemptRecord) {
            self.records
                .lock()
                .unwrap()
                .insert(record.key(), record);
        }

        fn stored(&self, email: &str) -> Option<LoginAttemptRecord> {
            self.records
                .lock()
                .unwrap()
                .get(&crate::crypto::email_key(email))
                .cloned()
        }
    }

    #[async_trait]
    impl LoginAttemptRepository for MockAttemptRepository {
        async fn get(&self, email_key: &str) -> Result<Option<LoginAttemptRecord>, Error> {
            Ok(self.records.lock().unwrap().get(email_key).cloned())
        }

        async fn upsert(&self, record: &LoginAttemptRecord) -> Result<(), Error> {
            self.records
                .lock()
                .unwrap()
                .insert(record.key(), record.clone());
            Ok(())
        }

        async fn delete(&self, email_key: &str) -> Result<(), Error> {
            self.records.lock().unwrap().remove(email_key);
            Ok(())
        }
    }

    /// Mailer that captures the plaintext codes it was asked to send.
    struct CapturingMailer {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl CapturingMailer {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
            }
        }

        fn last_code(&self) -> String {
            self.sent.lock().unwrap().last().unwrap().1.clone()
        }

        fn count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PasscodeMailer for CapturingMailer {
        async fn send_passcode(&self, to: &str, code: &str) -> Result<(), Error> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), code.to_string()));
            Ok(())
        }
    }

    fn service(repo: Arc<MockAttemptRepository>) -> LoginAttemptService<MockAttemptRepository> {
        LoginAttemptService::new(repo, PasscodePolicy::default())
    }

    fn pending(email: &str, code: &str, sent_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> LoginAttemptRecord {
        let mut record = LoginAttemptRecord::new(email.to_string());
        record.otp = OtpState::Pending {
            code_hash: hash_passcode(code),
            sent_at,
            expires_at,
        };
        record
    }

    #[tokio::test]
    async fn test_fail_count_is_monotonic() {
        let repo = Arc::new(MockAttemptRepository::new());
        let service = service(repo.clone());

        for n in 1..=4u32 {
            let status = service.record_failure("fan@club.example").await.unwrap();
            assert_eq!(status.fail_count, n);
            assert!(!status.requires_otp);
        }

        let status = service.record_failure("fan@club.example").await.unwrap();
        assert_eq!(status.fail_count, 5);
        assert!(status.requires_otp);
    }

    #[tokio::test]
    async fn test_otp_required_threshold_boundary() {
        let repo = Arc::new(MockAttemptRepository::new());
        let service = service(repo.clone());

        for _ in 0..4 {
            service.record_failure("fan@club.example").await.unwrap();
        }
        assert!(!service.otp_required("fan@club.example").await.unwrap());

        service.record_failure("fan@club.example").await.unwrap();
        assert!(service.otp_required("fan@club.example").await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_address_never_requires_otp() {
        let repo = Arc::new(MockAttemptRepository::new());
        let service = service(repo);
        assert!(!service.otp_required("nobody@club.example").await.unwrap());
    }

    #[tokio::test]
    async fn test_normalization_maps_to_one_record() {
        let repo = Arc::new(MockAttemptRepository::new());
        let service = service(repo.clone());

        service.record_failure("  Foo@Bar.com ").await.unwrap();
        let status = service.record_failure("foo@bar.com").await.unwrap();
        assert_eq!(status.fail_count, 2);

        let record = repo.stored("foo@bar.com").unwrap();
        assert_eq!(record.email, "foo@bar.com");
    }

    #[tokio::test]
    async fn test_missing_email_is_rejected_at_the_boundary() {
        let repo = Arc::new(MockAttemptRepository::new());
        let service = service(repo.clone());

        let err = service.record_failure("   ").await.unwrap_err();
        assert!(err.is_validation_error());
        assert!(repo.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_success_resets_count_and_window() {
        let repo = Arc::new(MockAttemptRepository::new());
        let service = service(repo.clone());

        for _ in 0..6 {
            service.record_failure("fan@club.example").await.unwrap();
        }
        assert!(service.otp_required("fan@club.example").await.unwrap());

        service.record_success("fan@club.example").await.unwrap();
        assert!(!service.otp_required("fan@club.example").await.unwrap());
        let record = repo.stored("fan@club.example").unwrap();
        assert_eq!(record.fail_count, 0);
        assert_eq!(record.last_failed_at, None);

        // Idempotent, including for addresses with no record at all.
        service.record_success("fan@club.example").await.unwrap();
        service.record_success("new@club.example").await.unwrap();
        assert!(repo.stored("new@club.example").is_none());
    }

    #[tokio::test]
    async fn test_request_otp_stores_hash_and_sends_plaintext() {
        let repo = Arc::new(MockAttemptRepository::new());
        let service = service(repo.clone());
        let mailer = CapturingMailer::new();

        service
            .request_otp("fan@club.example", &mailer)
            .await
            .unwrap();

        let code = mailer.last_code();
        assert_eq!(code.len(), 6);

        let record = repo.stored("fan@club.example").unwrap();
        match &record.otp {
            OtpState::Pending { code_hash, .. } => {
                // Only the hash is persisted, and it matches the sent code.
                assert_ne!(code_hash, &code);
                assert!(verify_passcode(&code, code_hash));
            }
            other => panic!("expected pending state, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resend_within_cooldown_is_rejected() {
        let repo = Arc::new(MockAttemptRepository::new());
        let service = service(repo.clone());
        let mailer = CapturingMailer::new();

        service
            .request_otp("fan@club.example", &mailer)
            .await
            .unwrap();
        let err = service
            .request_otp("fan@club.example", &mailer)
            .await
            .unwrap_err();
        assert!(err.is_rate_limited());
        assert_eq!(mailer.count(), 1);
    }

    #[tokio::test]
    async fn test_resend_after_cooldown_overwrites_old_code() {
        let repo = Arc::new(MockAttemptRepository::new());
        let service = service(repo.clone());
        let mailer = CapturingMailer::new();

        // Seed a code sent just past the cooldown.
        let now = Utc::now();
        repo.seed(pending(
            "fan@club.example",
            "111111",
            now - Duration::seconds(61),
            now + Duration::minutes(9),
        ));

        service
            .request_otp("fan@club.example", &mailer)
            .await
            .unwrap();

        // The old code no longer matches: overwritten, not expired.
        let err = service
            .verify_otp("fan@club.example", "111111")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::InvalidCode)));

        // The freshly issued code works.
        service
            .verify_otp("fan@club.example", &mailer.last_code())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_verify_succeeds_exactly_once() {
        let repo = Arc::new(MockAttemptRepository::new());
        let service = service(repo.clone());
        let mailer = CapturingMailer::new();

        service
            .request_otp("fan@club.example", &mailer)
            .await
            .unwrap();
        let code = mailer.last_code();

        service.verify_otp("fan@club.example", &code).await.unwrap();
        let record = repo.stored("fan@club.example").unwrap();
        assert!(matches!(record.otp, OtpState::Verified { .. }));

        // The code was cleared on success and cannot be replayed.
        let err = service
            .verify_otp("fan@club.example", &code)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::OtpExpired)));
    }

    #[tokio::test]
    async fn test_verify_unknown_address_is_not_found() {
        let repo = Arc::new(MockAttemptRepository::new());
        let service = service(repo);

        let err = service
            .verify_otp("nobody@club.example", "123456")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::OtpNotFound)));
    }

    #[tokio::test]
    async fn test_verify_expired_code_fails_even_on_exact_match() {
        let repo = Arc::new(MockAttemptRepository::new());
        let service = service(repo.clone());

        let now = Utc::now();
        repo.seed(pending(
            "fan@club.example",
            "424242",
            now - Duration::minutes(11),
            now - Duration::minutes(1),
        ));

        let err = service
            .verify_otp("fan@club.example", "424242")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::OtpExpired)));

        // Lazy expiry cleared the code on the way out.
        let record = repo.stored("fan@club.example").unwrap();
        assert_eq!(record.otp, OtpState::None);
    }

    #[tokio::test]
    async fn test_verification_does_not_touch_fail_count() {
        let repo = Arc::new(MockAttemptRepository::new());
        let service = service(repo.clone());
        let mailer = CapturingMailer::new();

        for _ in 0..5 {
            service.record_failure("fan@club.example").await.unwrap();
        }
        service
            .request_otp("fan@club.example", &mailer)
            .await
            .unwrap();
        service
            .verify_otp("fan@club.example", &mailer.last_code())
            .await
            .unwrap();

        let record = repo.stored("fan@club.example").unwrap();
        assert_eq!(record.fail_count, 5);
        // But the open window waives the challenge.
        assert!(!service.otp_required("fan@club.example").await.unwrap());
    }

    #[tokio::test]
    async fn test_window_survives_a_new_failure() {
        // A failure after verification does not slam the window shut; it
        // lives until its own expiry.
        let repo = Arc::new(MockAttemptRepository::new());
        let service = service(repo.clone());
        let mailer = CapturingMailer::new();

        for _ in 0..5 {
            service.record_failure("fan@club.example").await.unwrap();
        }
        service
            .request_otp("fan@club.example", &mailer)
            .await
            .unwrap();
        service
            .verify_otp("fan@club.example", &mailer.last_code())
            .await
            .unwrap();

        let status = service.record_failure("fan@club.example").await.unwrap();
        assert_eq!(status.fail_count, 6);
        assert!(!status.requires_otp);
    }

    #[tokio::test]
    async fn test_expired_window_requires_challenge_again() {
        let repo = Arc::new(MockAttemptRepository::new());
        let service = service(repo.clone());

        let now = Utc::now();
        let mut record = LoginAttemptRecord::new("fan@club.example".to_string());
        record.fail_count = 5;
        record.otp = OtpState::Verified {
            until: now - Duration::seconds(1),
        };
        repo.seed(record);

        assert!(service.otp_required("fan@club.example").await.unwrap());
    }

    #[tokio::test]
    async fn test_different_addresses_tracked_separately() {
        let repo = Arc::new(MockAttemptRepository::new());
        let service = service(repo);

        for _ in 0..5 {
            service.record_failure("one@club.example").await.unwrap();
        }
        assert!(service.otp_required("one@club.example").await.unwrap());
        assert!(!service.otp_required("two@club.example").await.unwrap());
    }
}
