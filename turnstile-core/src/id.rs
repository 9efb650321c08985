//! Prefixed random identifiers
//!
//! Profile ids are opaque strings of the form `usr_<base64url(96 bits)>`.
//! The prefix makes ids self-describing in logs and audit entries without
//! revealing anything about the record.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::{TryRngCore, rngs::OsRng};

/// Number of random bytes in an id (96 bits).
const ID_BYTES: usize = 12;

/// Encoded length of [`ID_BYTES`] in unpadded base64.
const ID_ENCODED_LEN: usize = 16;

/// Generate a new random id with the given prefix.
///
/// # Panics
///
/// Panics if the OS random number generator fails; see
/// [`crate::crypto::generate_passcode`].
pub fn generate_prefixed_id(prefix: &str) -> String {
    let mut bytes = [0u8; ID_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .expect("OS RNG failure - system entropy source unavailable");
    format!("{prefix}_{}", URL_SAFE_NO_PAD.encode(bytes))
}

/// Check that an id has the expected prefix and payload shape.
pub fn validate_prefixed_id(id: &str, prefix: &str) -> bool {
    match id.split_once('_') {
        Some((p, payload)) => {
            p == prefix
                && payload.len() == ID_ENCODED_LEN
                && URL_SAFE_NO_PAD
                    .decode(payload)
                    .map(|b| b.len() == ID_BYTES)
                    .unwrap_or(false)
        }
        None => false,
    }
}
