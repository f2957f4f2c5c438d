use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// Issues and verifies signed, time-bounded bearer tokens.
///
/// The signing secret and the token lifetime are fixed at construction and
/// never change afterwards, so a single instance can be shared across
/// request tasks behind an `Arc` without synchronization.
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenManager {
    /// HMAC family accepted on verification.
    const ACCEPTED_ALGORITHMS: [Algorithm; 3] =
        [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

    /// Create a new token manager.
    ///
    /// # Arguments
    /// * `secret` - Shared secret used for HMAC signing
    /// * `ttl` - Lifetime of issued tokens (may be negative in tests)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            ttl,
        }
    }

    /// Issue a token for `user_id`, valid from now until now + ttl.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        let claims = Claims::for_user(user_id, Utc::now(), self.ttl);

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and return the user id it was issued for.
    ///
    /// Rejects tokens that assert a non-HMAC algorithm, carry a bad
    /// signature, are malformed, lack a numeric `user_id`, or whose `exp` is
    /// not strictly in the future.
    ///
    /// # Errors
    /// * `InvalidToken` - Any of the checks above failed
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.algorithms = Self::ACCEPTED_ALGORITHMS.to_vec();
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!(error = ?e.kind(), "Token rejected");
            TokenError::InvalidToken
        })?;

        let claims = token_data.claims;
        if claims.is_expired(Utc::now().timestamp()) {
            tracing::debug!(exp = claims.exp, "Token rejected: expired");
            return Err(TokenError::InvalidToken);
        }

        Ok(claims.user_id)
    }
}
