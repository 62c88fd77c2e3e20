//! Opaque session tokens.

use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};

use crate::AuthError;

/// Random bytes per token (43 base64url characters).
pub const TOKEN_BYTES: usize = 32;

/// Mint a fresh URL-safe session token.
///
/// # Errors
///
/// Returns `AuthError::Random` if the OS random source fails.
pub fn new_session_token() -> Result<String, AuthError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    getrandom::fill(&mut bytes).map_err(|e| AuthError::Random(e.to_string()))?;
    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
}

/// When a session created at `now` stops being valid.
#[must_use]
pub fn session_expiry(now: DateTime<Utc>, ttl_hours: u64) -> DateTime<Utc> {
    let hours = i64::try_from(ttl_hours).unwrap_or(i64::MAX);
    now.checked_add_signed(Duration::try_hours(hours).unwrap_or(Duration::MAX))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn tokens_are_unique_and_url_safe() {
        let a = new_session_token().unwrap();
        let b = new_session_token().unwrap();
        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn expiry_adds_ttl() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            session_expiry(now, 336),
            Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn huge_ttl_saturates() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(session_expiry(now, u64::MAX), DateTime::<Utc>::MAX_UTC);
    }
}
