pub mod create_listing;
pub mod list_listings;

use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::listing::models::ListingWithAuthor;

/// Listing as rendered in HTTP responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingData {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: f64,
    pub author_login: String,
    pub is_owned: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ListingWithAuthor> for ListingData {
    fn from(listing: ListingWithAuthor) -> Self {
        Self {
            id: listing.id.0,
            title: listing.title,
            description: listing.description,
            image_url: listing.image_url,
            price: listing.price,
            author_login: listing.author_login,
            is_owned: listing.is_owned,
            created_at: listing.created_at,
        }
    }
}
