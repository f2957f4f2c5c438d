pub mod listing;
pub mod user;

pub use listing::PostgresListingRepository;
pub use user::PostgresUserRepository;

use crate::domain::user::errors::RepositoryError;

fn map_sqlx_error(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            RepositoryError::UniqueViolation(db_err.constraint().unwrap_or_default().to_string())
        }
        other => RepositoryError::Database(other.to_string()),
    }
}
