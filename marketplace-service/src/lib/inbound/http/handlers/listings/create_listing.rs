use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use url::Url;

use super::ListingData;
use crate::domain::listing::models::ListingWithAuthor;
use crate::domain::listing::models::NewListing;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn create_listing(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    payload: Result<Json<CreateListingRequest>, JsonRejection>,
) -> Result<ApiSuccess<ListingData>, ApiError> {
    let user_id = user_id.ok_or_else(ApiError::unauthorized)?;
    let Json(body) = payload?;
    body.validate()?;

    let listing = state
        .listing_service
        .create(body.into_domain(user_id))
        .await?;

    // The author name is cosmetic here; a lookup failure must not fail the
    // request once the listing is stored.
    let author_login = match state.auth_service.get_user(user_id).await {
        Ok(user) => user.username,
        Err(e) => {
            tracing::warn!(user_id = %user_id, error = %e, "Could not resolve listing author");
            String::new()
        }
    };

    let data = ListingWithAuthor {
        id: listing.id,
        title: listing.title,
        description: listing.description,
        image_url: listing.image_url,
        price: listing.price,
        author_login,
        is_owned: true,
        created_at: listing.created_at,
    };

    Ok(ApiSuccess::new(StatusCode::CREATED, data.into()))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateListingRequest {
    title: String,
    description: String,
    image_url: String,
    price: f64,
}

impl CreateListingRequest {
    const TITLE_LENGTH: std::ops::RangeInclusive<usize> = 3..=100;
    const DESCRIPTION_LENGTH: std::ops::RangeInclusive<usize> = 10..=500;

    fn validate(&self) -> Result<(), ApiError> {
        if !Self::TITLE_LENGTH.contains(&self.title.chars().count()) {
            return Err(invalid("title must be between 3 and 100 characters"));
        }
        if !Self::DESCRIPTION_LENGTH.contains(&self.description.chars().count()) {
            return Err(invalid("description must be between 10 and 500 characters"));
        }
        if !is_http_url(&self.image_url) {
            return Err(invalid("image_url must be an http or https URL"));
        }
        if self.price.is_nan() || self.price <= 0.0 {
            return Err(invalid("price must be positive"));
        }
        Ok(())
    }

    fn into_domain(self, user_id: UserId) -> NewListing {
        NewListing {
            title: self.title,
            description: self.description,
            image_url: self.image_url,
            price: self.price,
            user_id,
        }
    }
}

fn invalid(message: &str) -> ApiError {
    ApiError::UnprocessableEntity(message.to_string())
}

fn is_http_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}
