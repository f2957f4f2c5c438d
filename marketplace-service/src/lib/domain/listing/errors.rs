use thiserror::Error;

use crate::domain::user::errors::RepositoryError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ListingError {
    #[error("Invalid listing: {0}")]
    Invalid(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] RepositoryError),
}
