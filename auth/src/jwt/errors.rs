use thiserror::Error;

/// Error type for token operations.
///
/// Verification failures are deliberately collapsed into a single
/// `InvalidToken` kind: callers get a uniform "unauthorized" signal no
/// matter whether the signature, the algorithm, the expiry or the claims
/// were at fault.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Invalid token")]
    InvalidToken,
}
