use thiserror::Error;

/// Opaque persistence failure reported by a `UserRepository`.
///
/// Callers that want a friendlier message (e.g. "username taken") can
/// inspect the variant; the auth service itself passes it through as is.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Errors surfaced by the auth service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unknown username, wrong password, or missing user: never say which.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Persistence error: {0}")]
    Persistence(#[from] RepositoryError),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),
}

impl From<auth::TokenError> for AuthError {
    fn from(err: auth::TokenError) -> Self {
        match err {
            auth::TokenError::InvalidToken => AuthError::InvalidToken,
            auth::TokenError::EncodingFailed(msg) => AuthError::TokenIssuance(msg),
        }
    }
}
