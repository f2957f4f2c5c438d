use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::errors::AuthError;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

const LOGIN_FAILED_MESSAGE: &str = "unauthorized: invalid login or password";

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let Json(body) = payload?;

    if body.username.is_empty() || body.password.is_empty() {
        return Err(ApiError::UnprocessableEntity(
            "login and password cannot be empty".to_string(),
        ));
    }

    let token = state
        .auth_service
        .login(&body.username, &body.password)
        .await
        .map_err(|e| {
            if !matches!(e, AuthError::InvalidCredentials) {
                tracing::error!(error = %e, "Login failed");
            }
            ApiError::Unauthorized(LOGIN_FAILED_MESSAGE.to_string())
        })?;

    Ok(ApiSuccess::new(StatusCode::OK, LoginResponseData { token }))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use mockall::mock;

    use super::*;
    use crate::domain::listing::errors::ListingError;
    use crate::domain::listing::models::ListFilter;
    use crate::domain::listing::models::Listing;
    use crate::domain::listing::models::ListingWithAuthor;
    use crate::domain::listing::models::NewListing;
    use crate::domain::listing::ports::ListingServicePort;
    use crate::domain::user::errors::RepositoryError;
    use crate::domain::user::models::User;
    use crate::domain::user::models::UserId;
    use crate::domain::user::ports::AuthServicePort;

    mock! {
        pub TestAuthService {}

        #[async_trait]
        impl AuthServicePort for TestAuthService {
            async fn register(&self, username: &str, password: &str) -> Result<(User, String), AuthError>;
            async fn login(&self, username: &str, password: &str) -> Result<String, AuthError>;
            fn verify_token(&self, token: &str) -> Result<UserId, AuthError>;
            async fn get_user(&self, id: UserId) -> Result<User, AuthError>;
        }
    }

    mock! {
        pub TestListingService {}

        #[async_trait]
        impl ListingServicePort for TestListingService {
            async fn create(&self, listing: NewListing) -> Result<Listing, ListingError>;
            async fn list(&self, filter: ListFilter) -> Result<Vec<ListingWithAuthor>, ListingError>;
        }
    }

    fn state(auth_service: MockTestAuthService) -> State<AppState> {
        State(AppState {
            auth_service: Arc::new(auth_service),
            listing_service: Arc::new(MockTestListingService::new()),
        })
    }

    fn request() -> Result<Json<LoginRequest>, JsonRejection> {
        Ok(Json(LoginRequest {
            username: "alice".to_string(),
            password: "s3cret!".to_string(),
        }))
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut auth_service = MockTestAuthService::new();
        auth_service
            .expect_login()
            .times(1)
            .returning(|_, _| Ok("token".to_string()));

        let result = login(state(auth_service), request()).await;

        assert_eq!(
            result,
            Ok(ApiSuccess::new(
                StatusCode::OK,
                LoginResponseData {
                    token: "token".to_string()
                }
            ))
        );
    }

    #[tokio::test]
    async fn test_every_login_failure_is_unauthorized() {
        for error in [
            AuthError::InvalidCredentials,
            AuthError::TokenIssuance("signing failed".to_string()),
            AuthError::Hashing("worker panicked".to_string()),
            AuthError::Persistence(RepositoryError::Database("connection reset".to_string())),
        ] {
            let mut auth_service = MockTestAuthService::new();
            auth_service
                .expect_login()
                .times(1)
                .returning(move |_, _| Err(error.clone()));

            let result = login(state(auth_service), request()).await;

            assert_eq!(
                result,
                Err(ApiError::Unauthorized(LOGIN_FAILED_MESSAGE.to_string()))
            );
        }
    }
}
