//! Login-attempt records and the passcode lifecycle
//!
//! One record per email address, keyed in storage by a one-way hash of the
//! normalized address. The record counts consecutive authentication failures
//! and carries the one-time passcode lifecycle as an explicit tagged state:
//!
//! ```text
//! None ──request──▶ Pending ──verify──▶ Verified ──window ends──▶ None
//!                      │
//!                      └──deadline passes──▶ None (discovered on read)
//! ```
//!
//! There is no background sweep. Expiry is discovered lazily: [`OtpState::refresh`]
//! is applied when a record is read, collapsing a stale `Pending` or
//! `Verified` state back to `None`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::email_key;

/// The passcode lifecycle state carried on a [`LoginAttemptRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OtpState {
    /// No passcode outstanding and no verification window open.
    None,

    /// A passcode has been issued and not yet verified or expired.
    /// Only the hash of the code is stored.
    Pending {
        code_hash: String,
        sent_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    },

    /// A passcode was verified; the secondary challenge is waived until
    /// `until`, regardless of the current failure count.
    Verified { until: DateTime<Utc> },
}

impl OtpState {
    /// Collapse stale states as of `now`. A `Pending` past its deadline and
    /// a `Verified` past its window both become `None`; the consumed code
    /// hash is dropped with the state and can never match again.
    pub fn refresh(self, now: DateTime<Utc>) -> OtpState {
        match self {
            OtpState::Pending { expires_at, .. } if expires_at <= now => OtpState::None,
            OtpState::Verified { until } if until <= now => OtpState::None,
            other => other,
        }
    }

    /// Whether a verification window is open as of `now`.
    pub fn is_verified(&self, now: DateTime<Utc>) -> bool {
        matches!(self, OtpState::Verified { until } if *until > now)
    }
}

/// Per-email record of consecutive authentication failures and passcode
/// state. The whole record is one document in the credential store; writes
/// are last-writer-wins upserts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginAttemptRecord {
    /// Normalized address, kept alongside the hashed key for operational
    /// lookup. Never used as the storage key itself.
    pub email: String,

    /// Consecutive failures since the last success or reset.
    pub fail_count: u32,

    /// When the most recent failure happened.
    pub last_failed_at: Option<DateTime<Utc>>,

    /// Current passcode lifecycle state.
    pub otp: OtpState,
}

impl LoginAttemptRecord {
    /// A fresh record for an address with no prior failures.
    pub fn new(email: String) -> Self {
        Self {
            email,
            fail_count: 0,
            last_failed_at: None,
            otp: OtpState::None,
        }
    }

    /// The storage key for this record.
    pub fn key(&self) -> String {
        email_key(&self.email)
    }

    /// Register one authentication failure.
    pub fn record_failure(&mut self, now: DateTime<Utc>) {
        self.fail_count += 1;
        self.last_failed_at = Some(now);
    }

    /// Reset on successful primary authentication: failures and any open
    /// verification window are cleared. A still-pending passcode is left in
    /// place; it expires on its own deadline.
    pub fn record_success(&mut self) {
        self.fail_count = 0;
        self.last_failed_at = None;
        if matches!(self.otp, OtpState::Verified { .. }) {
            self.otp = OtpState::None;
        }
    }

    /// Whether the secondary challenge must be presented: the failure count
    /// has reached `threshold` and no verification window is open.
    pub fn requires_otp(&self, threshold: u32, now: DateTime<Utc>) -> bool {
        self.fail_count >= threshold && !self.otp.is_verified(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_failures_are_monotonic() {
        let mut record = LoginAttemptRecord::new("fan@club.example".to_string());
        let now = Utc::now();
        for n in 1..=7 {
            record.record_failure(now);
            assert_eq!(record.fail_count, n);
        }
        assert_eq!(record.last_failed_at, Some(now));
    }

    #[test]
    fn test_threshold_boundary() {
        let mut record = LoginAttemptRecord::new("fan@club.example".to_string());
        let now = Utc::now();
        for _ in 0..4 {
            record.record_failure(now);
        }
        assert!(!record.requires_otp(5, now));
        record.record_failure(now);
        assert!(record.requires_otp(5, now));
    }

    #[test]
    fn test_verified_window_waives_challenge() {
        let mut record = LoginAttemptRecord::new("fan@club.example".to_string());
        let now = Utc::now();
        for _ in 0..5 {
            record.record_failure(now);
        }
        record.otp = OtpState::Verified {
            until: now + Duration::minutes(10),
        };
        assert!(!record.requires_otp(5, now));

        // Window in the past no longer counts.
        record.otp = OtpState::Verified {
            until: now - Duration::seconds(1),
        };
        assert!(record.requires_otp(5, now));
    }

    #[test]
    fn test_success_resets_count_and_window() {
        let mut record = LoginAttemptRecord::new("fan@club.example".to_string());
        let now = Utc::now();
        for _ in 0..6 {
            record.record_failure(now);
        }
        record.otp = OtpState::Verified {
            until: now + Duration::minutes(10),
        };

        record.record_success();
        assert_eq!(record.fail_count, 0);
        assert_eq!(record.last_failed_at, None);
        assert_eq!(record.otp, OtpState::None);
        assert!(!record.requires_otp(5, now));

        // Idempotent.
        record.record_success();
        assert_eq!(record.fail_count, 0);
    }

    #[test]
    fn test_success_leaves_pending_code_alone() {
        let mut record = LoginAttemptRecord::new("fan@club.example".to_string());
        let now = Utc::now();
        record.otp = OtpState::Pending {
            code_hash: "abc".to_string(),
            sent_at: now,
            expires_at: now + Duration::minutes(10),
        };
        record.record_success();
        assert!(matches!(record.otp, OtpState::Pending { .. }));
    }

    #[test]
    fn test_refresh_collapses_stale_states() {
        let now = Utc::now();
        let pending = OtpState::Pending {
            code_hash: "abc".to_string(),
            sent_at: now - Duration::minutes(11),
            expires_at: now - Duration::minutes(1),
        };
        assert_eq!(pending.refresh(now), OtpState::None);

        let verified = OtpState::Verified {
            until: now - Duration::seconds(1),
        };
        assert_eq!(verified.refresh(now), OtpState::None);

        let live = OtpState::Pending {
            code_hash: "abc".to_string(),
            sent_at: now,
            expires_at: now + Duration::minutes(10),
        };
        assert_eq!(live.clone().refresh(now), live);
    }

    #[test]
    fn test_key_matches_normalized_email_hash() {
        let record = LoginAttemptRecord::new("foo@bar.com".to_string());
        assert_eq!(record.key(), email_key("foo@bar.com"));
    }
}
