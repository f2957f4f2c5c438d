use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListingId(pub i64);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A stored listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: f64,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Listing as shown in a feed: author login instead of author id, plus
/// whether the viewer owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingWithAuthor {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: f64,
    pub author_login: String,
    pub is_owned: bool,
    pub created_at: DateTime<Utc>,
}

/// Command to create a listing on behalf of `user_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: f64,
    pub user_id: UserId,
}

impl NewListing {
    const MAX_TITLE_LENGTH: usize = 100;
    const MAX_DESCRIPTION_LENGTH: usize = 1000;

    /// Domain-level checks, independent of how the request was parsed.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be blank".to_string());
        }
        if self.title.chars().count() > Self::MAX_TITLE_LENGTH {
            return Err(format!(
                "title must be at most {} characters",
                Self::MAX_TITLE_LENGTH
            ));
        }
        if self.description.chars().count() > Self::MAX_DESCRIPTION_LENGTH {
            return Err(format!(
                "description must be at most {} characters",
                Self::MAX_DESCRIPTION_LENGTH
            ));
        }
        if self.price.is_nan() || self.price <= 0.0 {
            return Err("price must be positive".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    CreatedAt,
    Price,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(Self::CreatedAt),
            "price" => Ok(Self::Price),
            other => Err(format!("unknown sort field: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// Filtering, ordering and pagination for the listing feed.
#[derive(Debug, Clone, PartialEq)]
pub struct ListFilter {
    pub limit: i64,
    pub offset: i64,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    /// Authenticated viewer, used only to flag their own listings.
    pub viewer_id: Option<UserId>,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            limit: 10,
            offset: 0,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
            price_min: None,
            price_max: None,
            viewer_id: None,
        }
    }
}
