use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenManager;

use crate::domain::user::errors::AuthError;
use crate::domain::user::errors::RepositoryError;
use crate::domain::user::models::validate_registration;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::AuthServicePort;
use crate::domain::user::ports::UserRepository;

/// Well-formed hash that matches no password. Login runs a verification
/// against it for unknown usernames so both failure paths cost the same.
const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Registration and login orchestration.
///
/// Persistence is delegated to the repository, cryptography to the
/// `auth` crate. The service holds no mutable state.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    token_manager: Arc<TokenManager>,
    password_hasher: PasswordHasher,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `token_manager` - Token signer configured with the process secret and ttl
    pub fn new(repository: Arc<UR>, token_manager: Arc<TokenManager>) -> Self {
        Self {
            repository,
            token_manager,
            password_hasher: PasswordHasher::new(),
        }
    }

    /// Replace the default password hasher (e.g. to tune its cost).
    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self
    }

    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Any failure to verify (including an unusable stored hash) counts as
    /// a mismatch.
    async fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        let hasher = self.password_hasher.clone();
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();

        match tokio::task::spawn_blocking(move || hasher.verify(&password, &password_hash)).await {
            Ok(Ok(matches)) => matches,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Stored password hash could not be used");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "Password verification task failed");
                false
            }
        }
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, username: &str, password: &str) -> Result<(User, String), AuthError> {
        if let Err(reason) = validate_registration(username, password) {
            tracing::warn!(username = %username, reason = %reason, "Invalid registration input");
            return Err(AuthError::InvalidInput(reason));
        }

        let password_hash = self.hash_password(password).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to hash password");
            e
        })?;

        let user = self
            .repository
            .create_user(NewUser {
                username: username.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| {
                tracing::error!(username = %username, error = %e, "Failed to create user");
                AuthError::Persistence(e)
            })?;

        // The user row stays even if signing fails below.
        let token = self.token_manager.issue(user.id.as_i64()).map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "Failed to issue token for new user");
            AuthError::from(e)
        })?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok((user, token))
    }

    async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let user = match self.repository.get_user_by_username(username).await {
            Ok(user) => user,
            Err(e) => {
                if !matches!(e, RepositoryError::NotFound) {
                    tracing::error!(username = %username, error = %e, "User lookup failed");
                }
                tracing::warn!(username = %username, "Login rejected: user not found");
                self.verify_password(password, DUMMY_PASSWORD_HASH).await;
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self.verify_password(password, &user.password_hash).await {
            tracing::warn!(user_id = %user.id, "Login rejected: invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.token_manager.issue(user.id.as_i64()).map_err(|e| {
            tracing::error!(user_id = %user.id, error = %e, "Failed to issue token");
            AuthError::from(e)
        })?;

        tracing::info!(user_id = %user.id, "Login successful");
        Ok(token)
    }

    fn verify_token(&self, token: &str) -> Result<UserId, AuthError> {
        self.token_manager
            .verify(token)
            .map(UserId::from)
            .map_err(AuthError::from)
    }

    async fn get_user(&self, id: UserId) -> Result<User, AuthError> {
        self.repository.get_user_by_id(id).await.map_err(|e| {
            tracing::warn!(user_id = %id, error = %e, "User lookup failed");
            AuthError::InvalidCredentials
        })
    }
}
