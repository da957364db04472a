//! Password hashing and verification.
//!
//! bcrypt with a fixed cost of 10. The salt is embedded in the digest, so
//! two hashes of the same plaintext differ while both still verify.

use crate::error::AppResult;

/// bcrypt cost factor.
const COST: u32 = 10;

/// Hash a plaintext password. A hashing failure aborts the surrounding
/// write as an internal error.
///
/// Call sites are limited to signup, OAuth provisioning, and the
/// change-password operation, so a plaintext is hashed exactly once per
/// logical password change and a stored digest is never re-hashed.
pub fn hash(plaintext: &str) -> AppResult<String> {
    Ok(bcrypt::hash(plaintext, COST)?)
}

/// Verify a plaintext against a stored digest. A mismatch (or an
/// unparseable digest) is a normal negative result, not an error.
pub fn verify(plaintext: &str, digest: &str) -> bool {
    bcrypt::verify(plaintext, digest).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_plaintext_hashes_differently_but_both_verify() {
        let first = hash("secret12").unwrap();
        let second = hash("secret12").unwrap();

        assert_ne!(first, second);
        assert!(verify("secret12", &first));
        assert!(verify("secret12", &second));
    }

    #[test]
    fn test_stored_digest_differs_from_plaintext() {
        let digest = hash("secret12").unwrap();
        assert_ne!(digest, "secret12");
    }

    #[test]
    fn test_wrong_password_fails_verification() {
        let digest = hash("secret12").unwrap();
        assert!(!verify("secret13", &digest));
    }

    #[test]
    fn test_garbage_digest_is_a_negative_result_not_a_panic() {
        assert!(!verify("secret12", "not-a-bcrypt-digest"));
    }
}
