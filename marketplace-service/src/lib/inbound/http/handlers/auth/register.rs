use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::errors::AuthError;
use crate::domain::user::models::User;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    let Json(body) = payload?;
    body.validate()?;

    let (user, token) = state
        .auth_service
        .register(&body.username, &body.password)
        .await
        .map_err(|e| match e {
            AuthError::InvalidInput(msg) => ApiError::UnprocessableEntity(msg),
            other => {
                tracing::error!(error = %other, "Registration failed");
                ApiError::InternalServerError("could not register user".to_string())
            }
        })?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        RegisterResponseData {
            user: (&user).into(),
            token,
        },
    ))
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequest {
    username: String,
    password: String,
}

impl RegisterRequest {
    const USERNAME_LENGTH: std::ops::RangeInclusive<usize> = 3..=32;
    const PASSWORD_LENGTH: std::ops::RangeInclusive<usize> = 6..=128;

    fn validate(&self) -> Result<(), ApiError> {
        if Self::USERNAME_LENGTH.contains(&self.username.chars().count())
            && Self::PASSWORD_LENGTH.contains(&self.password.chars().count())
        {
            Ok(())
        } else {
            Err(ApiError::UnprocessableEntity(
                "username and password must meet validation constraints".to_string(),
            ))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub user: UserData,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_i64(),
            username: user.username.clone(),
            created_at: user.created_at,
        }
    }
}
