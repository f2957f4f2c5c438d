use std::fmt;

use chrono::DateTime;
use chrono::Utc;

/// Registered user.
///
/// `password_hash` is an opaque PHC string; it must never leave the
/// service boundary (HTTP response types copy only the public fields).
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User identifier assigned by the repository on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl UserId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Data handed to the repository to create a user row.
///
/// The id and creation timestamp are assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

/// Static checks on registration input.
///
/// Only the lower bounds live here; upper bounds are enforced where the
/// request body is parsed.
pub(crate) fn validate_registration(username: &str, password: &str) -> Result<(), String> {
    const MIN_USERNAME_LENGTH: usize = 3;
    const MIN_PASSWORD_LENGTH: usize = 6;

    if username.trim().is_empty() {
        return Err("username must not be blank".to_string());
    }
    if username.len() < MIN_USERNAME_LENGTH {
        return Err(format!(
            "username must be at least {} characters",
            MIN_USERNAME_LENGTH
        ));
    }
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    Ok(())
}
