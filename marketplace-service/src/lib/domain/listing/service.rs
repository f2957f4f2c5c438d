use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::listing::errors::ListingError;
use crate::domain::listing::models::ListFilter;
use crate::domain::listing::models::Listing;
use crate::domain::listing::models::ListingWithAuthor;
use crate::domain::listing::models::NewListing;
use crate::domain::listing::ports::ListingRepository;
use crate::domain::listing::ports::ListingServicePort;

pub struct ListingService<LR>
where
    LR: ListingRepository,
{
    repository: Arc<LR>,
}

impl<LR> ListingService<LR>
where
    LR: ListingRepository,
{
    pub fn new(repository: Arc<LR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<LR> ListingServicePort for ListingService<LR>
where
    LR: ListingRepository,
{
    async fn create(&self, listing: NewListing) -> Result<Listing, ListingError> {
        if let Err(reason) = listing.validate() {
            tracing::warn!(user_id = %listing.user_id, reason = %reason, "Invalid listing data");
            return Err(ListingError::Invalid(reason));
        }

        let created = self.repository.create_listing(listing).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to create listing");
            ListingError::from(e)
        })?;

        tracing::info!(listing_id = %created.id, user_id = %created.user_id, "Listing created");
        Ok(created)
    }

    async fn list(&self, filter: ListFilter) -> Result<Vec<ListingWithAuthor>, ListingError> {
        let listings = self.repository.list_listings(&filter).await.map_err(|e| {
            tracing::error!(error = %e, filter = ?filter, "Failed to fetch listings");
            ListingError::from(e)
        })?;

        tracing::debug!(count = listings.len(), "Listings fetched");
        Ok(listings)
    }
}
