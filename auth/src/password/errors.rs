use thiserror::Error;

/// Error type for credential hashing.
///
/// A plain password mismatch is not an error; see `PasswordHasher::verify`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Stored password hash is unusable: {0}")]
    VerificationFailed(String),

    #[error("Invalid hashing cost parameters: {0}")]
    InvalidParams(String),
}
