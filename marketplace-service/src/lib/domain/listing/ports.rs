use async_trait::async_trait;

use crate::domain::listing::errors::ListingError;
use crate::domain::listing::models::ListFilter;
use crate::domain::listing::models::Listing;
use crate::domain::listing::models::ListingWithAuthor;
use crate::domain::listing::models::NewListing;
use crate::domain::user::errors::RepositoryError;

/// Port for listing operations.
#[async_trait]
pub trait ListingServicePort: Send + Sync + 'static {
    /// # Errors
    /// * `Invalid` - Listing failed domain validation; nothing was persisted
    /// * `Persistence` - Repository failure
    async fn create(&self, listing: NewListing) -> Result<Listing, ListingError>;

    /// # Errors
    /// * `Persistence` - Repository failure
    async fn list(&self, filter: ListFilter) -> Result<Vec<ListingWithAuthor>, ListingError>;
}

/// Persistence operations for listings.
#[async_trait]
pub trait ListingRepository: Send + Sync + 'static {
    async fn create_listing(&self, listing: NewListing) -> Result<Listing, RepositoryError>;

    /// Page of listings joined with their author, ordered and filtered per
    /// `filter`; rows authored by `filter.viewer_id` have `is_owned` set.
    async fn list_listings(
        &self,
        filter: &ListFilter,
    ) -> Result<Vec<ListingWithAuthor>, RepositoryError>;
}
