use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::QueryBuilder;

use super::map_sqlx_error;
use crate::domain::listing::models::ListFilter;
use crate::domain::listing::models::Listing;
use crate::domain::listing::models::ListingId;
use crate::domain::listing::models::ListingWithAuthor;
use crate::domain::listing::models::NewListing;
use crate::domain::listing::models::SortBy;
use crate::domain::listing::models::SortOrder;
use crate::domain::listing::ports::ListingRepository;
use crate::domain::user::errors::RepositoryError;
use crate::domain::user::models::UserId;

pub struct PostgresListingRepository {
    pool: PgPool,
}

impl PostgresListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ListingRow {
    id: i64,
    title: String,
    description: String,
    image_url: String,
    price: f64,
    user_id: i64,
    created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct ListingWithAuthorRow {
    id: i64,
    title: String,
    description: String,
    image_url: String,
    price: f64,
    author_login: String,
    is_owned: bool,
    created_at: DateTime<Utc>,
}

impl From<ListingRow> for Listing {
    fn from(row: ListingRow) -> Self {
        Listing {
            id: ListingId(row.id),
            title: row.title,
            description: row.description,
            image_url: row.image_url,
            price: row.price,
            user_id: UserId::from(row.user_id),
            created_at: row.created_at,
        }
    }
}

impl From<ListingWithAuthorRow> for ListingWithAuthor {
    fn from(row: ListingWithAuthorRow) -> Self {
        ListingWithAuthor {
            id: ListingId(row.id),
            title: row.title,
            description: row.description,
            image_url: row.image_url,
            price: row.price,
            author_login: row.author_login,
            is_owned: row.is_owned,
            created_at: row.created_at,
        }
    }
}

fn order_clause(sort_by: SortBy, sort_order: SortOrder) -> &'static str {
    match (sort_by, sort_order) {
        (SortBy::CreatedAt, SortOrder::Asc) => " ORDER BY l.created_at ASC, l.id ASC",
        (SortBy::CreatedAt, SortOrder::Desc) => " ORDER BY l.created_at DESC, l.id DESC",
        (SortBy::Price, SortOrder::Asc) => " ORDER BY l.price ASC, l.id ASC",
        (SortBy::Price, SortOrder::Desc) => " ORDER BY l.price DESC, l.id DESC",
    }
}

fn build_list_query(filter: &ListFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::<Postgres>::new(
        "SELECT l.id, l.title, l.description, l.image_url, l.price, \
         u.username AS author_login, (l.user_id = ",
    );
    // NULL never equals anything, so anonymous viewers own nothing.
    query.push_bind(filter.viewer_id.map(|id| id.as_i64()));
    query.push(
        ") IS TRUE AS is_owned, l.created_at \
         FROM listings l JOIN users u ON l.user_id = u.id WHERE 1=1",
    );

    if let Some(min) = filter.price_min {
        query.push(" AND l.price >= ").push_bind(min);
    }
    if let Some(max) = filter.price_max {
        query.push(" AND l.price <= ").push_bind(max);
    }

    query.push(order_clause(filter.sort_by, filter.sort_order));
    query.push(" LIMIT ").push_bind(filter.limit);
    query.push(" OFFSET ").push_bind(filter.offset);
    query
}

#[async_trait]
impl ListingRepository for PostgresListingRepository {
    async fn create_listing(&self, listing: NewListing) -> Result<Listing, RepositoryError> {
        let row = sqlx::query_as::<_, ListingRow>(
            r#"
            INSERT INTO listings (title, description, image_url, price, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, image_url, price, user_id, created_at
            "#,
        )
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(&listing.image_url)
        .bind(listing.price)
        .bind(listing.user_id.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn list_listings(
        &self,
        filter: &ListFilter,
    ) -> Result<Vec<ListingWithAuthor>, RepositoryError> {
        let rows = build_list_query(filter)
            .build_query_as::<ListingWithAuthorRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ListingWithAuthor::from).collect())
    }
}
