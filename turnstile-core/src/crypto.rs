//! Cryptographic utilities for passcode and lookup-key handling
//!
//! Login-attempt records are keyed by a one-way hash of the normalized email
//! address rather than the address itself, and outstanding one-time passcodes
//! are stored only as hashes. Verification uses constant-time comparison via
//! the `subtle` crate so a mismatch cannot be located by timing.
//!
//! Passcodes are short numeric secrets, so unlike high-entropy tokens their
//! main defence is the small verification window and the attempt threshold,
//! not the hash; SHA-256 is used for storage so a leaked record never reveals
//! a still-valid code.

use rand::{TryRngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Derive the storage key for a login-attempt record.
///
/// The input must already be normalized (see [`crate::normalize_email`]);
/// the same logical address then always maps to the same key regardless of
/// the casing or whitespace it was submitted with.
///
/// # Returns
///
/// A hex-encoded SHA-256 digest of the normalized address.
pub fn email_key(normalized_email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalized_email.as_bytes());
    hex::encode(hasher.finalize())
}

/// Hash a passcode for storage.
///
/// The plaintext code is handed to the mailer and then dropped; only this
/// digest is ever persisted.
pub fn hash_passcode(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verify a passcode against a stored hash with constant-time comparison.
///
/// The comparison is exact and case-sensitive: the supplied code is hashed
/// as-is and the hex digests are compared byte for byte.
pub fn verify_passcode(code: &str, stored_hash: &str) -> bool {
    let computed = hash_passcode(code);
    constant_time_compare(computed.as_bytes(), stored_hash.as_bytes())
}

/// Generate a uniformly random numeric passcode of `length` digits.
///
/// Uses rejection sampling over the OS RNG so every code in the range is
/// equally likely; a plain modulo would bias toward low codes. Leading
/// zeroes are preserved (`length` must be between 1 and 9).
///
/// # Panics
///
/// Panics if the OS random number generator fails. This indicates a critical
/// system failure (e.g., /dev/urandom unavailable) from which recovery is not
/// possible for security-sensitive operations.
pub fn generate_passcode(length: usize) -> String {
    assert!((1..=9).contains(&length), "passcode length out of range");
    let span = 10u32.pow(length as u32);
    let limit = u32::MAX - (u32::MAX % span);

    let value = loop {
        let mut bytes = [0u8; 4];
        OsRng
            .try_fill_bytes(&mut bytes)
            .expect("OS RNG failure - system entropy source unavailable");
        let candidate = u32::from_be_bytes(bytes);
        if candidate < limit {
            break candidate % span;
        }
    };

    format!("{value:0width$}", width = length)
}

/// Perform constant-time comparison of two byte slices.
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
