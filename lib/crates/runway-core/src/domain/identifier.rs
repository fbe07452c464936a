//! Session identifier generation and validation.
//!
//! Identifiers double as remote repository names, so they stay short and
//! restricted to characters every platform accepts.

use crate::domain::error::SessionError;
use crate::domain::session::SessionId;

/// Human-readable prefix of every session identifier.
pub const SESSION_ID_PREFIX: &str = "repo-";

/// Number of random characters after the prefix.
pub const SESSION_ID_SUFFIX_LEN: usize = 8;

const ALPHABET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a session identifier: `repo-` followed by 8 characters of `[a-z0-9]`.
///
/// Entropy sources: nanosecond timestamp and two independent `RandomState`
/// hashes. Not cryptographically secure; 36^8 suffixes keep collisions
/// between concurrent sessions negligible.
#[must_use]
pub fn generate_session_id() -> SessionId {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u128(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0),
    );
    hasher.write_u64(RandomState::new().build_hasher().finish());
    hasher.write_u64(RandomState::new().build_hasher().finish());

    let mut bits = hasher.finish();
    let mut id = String::with_capacity(SESSION_ID_PREFIX.len() + SESSION_ID_SUFFIX_LEN);
    id.push_str(SESSION_ID_PREFIX);
    for _ in 0..SESSION_ID_SUFFIX_LEN {
        let idx = usize::try_from(bits % 36).unwrap_or(0);
        id.push(char::from(ALPHABET[idx]));
        bits /= 36;
    }
    SessionId::from_raw(id)
}

/// Validates session identifier format.
///
/// # Errors
///
/// Returns an error if the identifier is not `repo-` plus 8 of `[a-z0-9]`.
pub fn validate_session_id(id: &str) -> Result<(), SessionError> {
    let Some(suffix) = id.strip_prefix(SESSION_ID_PREFIX) else {
        return Err(SessionError::InvalidId(id.to_string()));
    };
    if suffix.len() != SESSION_ID_SUFFIX_LEN
        || !suffix
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    {
        return Err(SessionError::InvalidId(id.to_string()));
    }
    Ok(())
}

impl std::str::FromStr for SessionId {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_session_id(s)?;
        Ok(Self::from_raw(s.to_string()))
    }
}
