//! Input normalization for boundary values
//!
//! Every email address entering the subsystem is normalized before it is
//! hashed or looked up, so the same logical address always maps to one
//! attempt record regardless of input casing or surrounding whitespace.

use crate::{Error, error::ValidationError};

/// Normalize an email address: trim surrounding whitespace and lowercase.
///
/// An address that is empty after trimming is a missing required field, not
/// a malformed one; the boundary maps it to a 400.
pub fn normalize_email(raw: &str) -> Result<String, Error> {
    let email = raw.trim().to_ascii_lowercase();
    if email.is_empty() {
        return Err(ValidationError::MissingField("email".to_string()).into());
    }
    Ok(email)
}

/// Infallible variant used where the caller must never see an error, such as
/// allow-list membership checks inside the access guard. An empty result
/// simply matches nothing.
pub fn normalize_email_lossy(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize_email("  Foo@Bar.com ").unwrap(), "foo@bar.com");
        assert_eq!(normalize_email("foo@bar.com").unwrap(), "foo@bar.com");
    }

    #[test]
    fn test_normalized_addresses_share_a_key() {
        let a = normalize_email("  Foo@Bar.com ").unwrap();
        let b = normalize_email("foo@bar.com").unwrap();
        assert_eq!(crate::crypto::email_key(&a), crate::crypto::email_key(&b));
    }

    #[test]
    fn test_empty_email_is_missing_field() {
        let err = normalize_email("   ").unwrap_err();
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_lossy_never_fails() {
        assert_eq!(normalize_email_lossy("   "), "");
        assert_eq!(normalize_email_lossy(" A@B.C "), "a@b.c");
    }
}
