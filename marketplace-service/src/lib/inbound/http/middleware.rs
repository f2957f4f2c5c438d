use std::convert::Infallible;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::Extensions;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::domain::user::ports::AuthServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated identity attached to a request by the auth middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// What to do when a request carries no credential at all.
///
/// A malformed header or a token that fails verification is rejected under
/// either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    Required,
    Optional,
}

/// Credential found in the `Authorization` header.
#[derive(Debug, PartialEq, Eq)]
enum Credential<'a> {
    NoHeader,
    BadFormat,
    Bearer(&'a str),
}

/// Read the authenticated user id from request extensions.
///
/// `None` means the request is unauthenticated.
pub fn get_user_id(extensions: &Extensions) -> Option<UserId> {
    extensions
        .get::<AuthenticatedUser>()
        .map(|user| user.user_id)
}

/// Attach an authenticated user id to request extensions.
///
/// Only the auth middleware calls this in production; tests use it to
/// simulate authenticated requests.
pub fn with_user_id(extensions: &mut Extensions, user_id: UserId) {
    extensions.insert(AuthenticatedUser { user_id });
}

/// Rejects the request with 401 unless it carries a valid bearer token.
pub async fn require_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    authorize(state.auth_service.as_ref(), AuthPolicy::Required, req, next).await
}

/// Lets requests without an `Authorization` header through unauthenticated;
/// a header that is present must still be a valid bearer token.
pub async fn optional_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    authorize(state.auth_service.as_ref(), AuthPolicy::Optional, req, next).await
}

async fn authorize(
    auth_service: &dyn AuthServicePort,
    policy: AuthPolicy,
    mut req: Request,
    next: Next,
) -> Response {
    let user_id = match read_credential(req.headers()) {
        Credential::NoHeader => match policy {
            AuthPolicy::Required => {
                tracing::warn!("Missing Authorization header");
                return ApiError::unauthorized().into_response();
            }
            AuthPolicy::Optional => {
                tracing::debug!("No Authorization header, continuing unauthenticated");
                None
            }
        },
        Credential::BadFormat => {
            tracing::warn!(policy = ?policy, "Malformed Authorization header");
            return ApiError::unauthorized().into_response();
        }
        Credential::Bearer(token) => match auth_service.verify_token(token) {
            Ok(user_id) => Some(user_id),
            Err(e) => {
                tracing::warn!(policy = ?policy, error = %e, "Token verification failed");
                return ApiError::unauthorized().into_response();
            }
        },
    };

    if let Some(user_id) = user_id {
        tracing::debug!(user_id = %user_id, "User authenticated");
        with_user_id(req.extensions_mut(), user_id);
    }

    next.run(req).await
}

fn read_credential(headers: &HeaderMap) -> Credential<'_> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Credential::NoHeader;
    };

    if value.is_empty() {
        return Credential::NoHeader;
    }

    match value.to_str() {
        Ok(value) => match value.strip_prefix(BEARER_PREFIX) {
            Some(token) if !token.is_empty() => Credential::Bearer(token),
            _ => Credential::BadFormat,
        },
        Err(_) => Credential::BadFormat,
    }
}

/// Extractor exposing the optional authenticated user id to handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Option<UserId>);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(get_user_id(&parts.extensions)))
    }
}
