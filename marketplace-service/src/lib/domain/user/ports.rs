use async_trait::async_trait;

use crate::domain::user::errors::AuthError;
use crate::domain::user::errors::RepositoryError;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Port for authentication operations used by handlers and middleware.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user and issue a token for it.
    ///
    /// # Arguments
    /// * `username` - At least 3 characters, not blank
    /// * `password` - At least 6 characters
    ///
    /// # Returns
    /// Created user and a fresh access token
    ///
    /// # Errors
    /// * `InvalidInput` - Static validation failed; nothing was persisted
    /// * `Hashing` - Password hashing primitive failed
    /// * `Persistence` - Repository failure (including duplicate username), unchanged
    /// * `TokenIssuance` - Token signing failed after the user row was created
    async fn register(&self, username: &str, password: &str) -> Result<(User, String), AuthError>;

    /// Check credentials and issue a fresh token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password (indistinguishable)
    /// * `TokenIssuance` - Token signing failed
    async fn login(&self, username: &str, password: &str) -> Result<String, AuthError>;

    /// Resolve a bearer token to the user id it was issued for.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature, algorithm, expiry or claims check failed
    fn verify_token(&self, token: &str) -> Result<UserId, AuthError>;

    /// Fetch a user by id.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No such user, or the lookup failed
    async fn get_user(&self, id: UserId) -> Result<User, AuthError>;
}

/// Persistence operations for users.
///
/// Implementations own their connection handling and must be safe to call
/// concurrently.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Insert a user; the id and creation time are assigned by storage.
    ///
    /// # Errors
    /// * `UniqueViolation` - Username is already taken
    /// * `Database` - Storage failure
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// # Errors
    /// * `NotFound` - No user with this username
    /// * `Database` - Storage failure
    async fn get_user_by_username(&self, username: &str) -> Result<User, RepositoryError>;

    /// # Errors
    /// * `NotFound` - No user with this id
    /// * `Database` - Storage failure
    async fn get_user_by_id(&self, id: UserId) -> Result<User, RepositoryError>;
}
