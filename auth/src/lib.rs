//! Credential and token primitives.
//!
//! - Password hashing (Argon2id, PHC string output)
//! - Signed, time-bounded bearer tokens (JWT, HMAC family)
//!
//! Orchestration (registration, login, who may call what) lives in the
//! service crate; this library only knows how to hash, verify, sign and
//! check.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("not_my_password", &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::TokenManager;
//! use chrono::Duration;
//!
//! let tokens = TokenManager::new(b"secret_key_at_least_32_bytes_long!", Duration::minutes(15));
//! let token = tokens.issue(42).unwrap();
//! assert_eq!(tokens.verify(&token).unwrap(), 42);
//! ```

pub mod jwt;
pub mod password;

pub use jwt::Claims;
pub use jwt::TokenError;
pub use jwt::TokenManager;
pub use password::PasswordError;
pub use password::PasswordHasher;
