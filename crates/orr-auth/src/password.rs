//! bcrypt password hashing.

use crate::AuthError;

/// Shortest password accepted for new accounts.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Hash `password` with the given bcrypt cost.
///
/// # Errors
///
/// Returns `AuthError::Hash` when the cost is out of range or hashing fails.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Check `password` against a stored hash.
///
/// A malformed stored hash counts as a mismatch rather than an error, so a
/// corrupted row can't be told apart from a wrong password.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(matches) => matches,
        Err(error) => {
            tracing::warn!(%error, "stored password hash could not be verified");
            false
        }
    }
}

/// Reject passwords too short or blank to be useful.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` describing the problem.
pub fn validate_new_password(password: &str) -> Result<(), AuthError> {
    if password.trim().is_empty() {
        return Err(AuthError::WeakPassword("password must not be blank".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("correct horse", TEST_COST).unwrap();
        assert!(hash.starts_with("$2"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same password", TEST_COST).unwrap();
        let b = hash_password("same password", TEST_COST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_mismatch() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }

    #[test]
    fn invalid_cost_is_error() {
        assert!(matches!(hash_password("pw", 2), Err(AuthError::Hash(_))));
    }

    #[test]
    fn short_passwords_rejected() {
        assert!(validate_new_password("short").is_err());
        assert!(validate_new_password("        ").is_err());
        assert!(validate_new_password("long enough").is_ok());
    }
}
