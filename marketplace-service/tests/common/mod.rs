#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenManager;
use axum::body::Body;
use axum::http::header;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use chrono::Duration;
use chrono::Utc;
use http_body_util::BodyExt;
use marketplace_service::domain::listing::models::ListFilter;
use marketplace_service::domain::listing::models::Listing;
use marketplace_service::domain::listing::models::ListingId;
use marketplace_service::domain::listing::models::ListingWithAuthor;
use marketplace_service::domain::listing::models::NewListing;
use marketplace_service::domain::listing::models::SortBy;
use marketplace_service::domain::listing::models::SortOrder;
use marketplace_service::domain::listing::ports::ListingRepository;
use marketplace_service::domain::listing::service::ListingService;
use marketplace_service::domain::user::errors::RepositoryError;
use marketplace_service::domain::user::models::NewUser;
use marketplace_service::domain::user::models::User;
use marketplace_service::domain::user::models::UserId;
use marketplace_service::domain::user::ports::UserRepository;
use marketplace_service::domain::user::service::AuthService;
use marketplace_service::inbound::http::router::create_router;
use marketplace_service::inbound::http::router::AppState;
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// In-memory stand-in for the users table.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(RepositoryError::UniqueViolation(
                "users_username_key".to_string(),
            ));
        }

        let created = User {
            id: UserId(users.len() as i64 + 1),
            username: user.username,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User, RepositoryError> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_user_by_id(&self, id: UserId) -> Result<User, RepositoryError> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }
}

/// In-memory stand-in for the listings table, joined against `users`.
pub struct InMemoryListingRepository {
    users: Arc<InMemoryUserRepository>,
    listings: Mutex<Vec<Listing>>,
}

impl InMemoryListingRepository {
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            users,
            listings: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn create_listing(&self, listing: NewListing) -> Result<Listing, RepositoryError> {
        let mut listings = self.listings.lock().unwrap();
        let created = Listing {
            id: ListingId(listings.len() as i64 + 1),
            title: listing.title,
            description: listing.description,
            image_url: listing.image_url,
            price: listing.price,
            user_id: listing.user_id,
            created_at: Utc::now(),
        };
        listings.push(created.clone());
        Ok(created)
    }

    async fn list_listings(
        &self,
        filter: &ListFilter,
    ) -> Result<Vec<ListingWithAuthor>, RepositoryError> {
        let mut rows: Vec<Listing> = self
            .listings
            .lock()
            .unwrap()
            .iter()
            .filter(|l| filter.price_min.map_or(true, |min| l.price >= min))
            .filter(|l| filter.price_max.map_or(true, |max| l.price <= max))
            .cloned()
            .collect();

        rows.sort_by(|a, b| {
            let ordering = match filter.sort_by {
                SortBy::CreatedAt => a.id.0.cmp(&b.id.0),
                SortBy::Price => a.price.total_cmp(&b.price),
            };
            match filter.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let mut page = Vec::new();
        for listing in rows
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
        {
            let author = self.users.get_user_by_id(listing.user_id).await?;
            page.push(ListingWithAuthor {
                id: listing.id,
                title: listing.title,
                description: listing.description,
                image_url: listing.image_url,
                price: listing.price,
                author_login: author.username,
                is_owned: filter.viewer_id == Some(listing.user_id),
                created_at: listing.created_at,
            });
        }
        Ok(page)
    }
}

/// Full application router over in-memory storage.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub token_manager: Arc<TokenManager>,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::default());
        let listings = Arc::new(InMemoryListingRepository::new(Arc::clone(&users)));
        let token_manager = Arc::new(TokenManager::new(TEST_SECRET, Duration::minutes(15)));

        let hasher = PasswordHasher::with_cost(1024, 1, 1).expect("valid argon2 params");
        let auth_service = Arc::new(
            AuthService::new(users, Arc::clone(&token_manager)).with_password_hasher(hasher),
        );
        let listing_service = Arc::new(ListingService::new(listings));

        let state = AppState {
            auth_service: auth_service.clone(),
            listing_service: listing_service.clone(),
        };

        Self {
            router: create_router(auth_service, listing_service),
            state,
            token_manager,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        send(self.router.clone(), method, uri, token, body).await
    }

    /// Registers `username` and returns `(user_id, token)`.
    pub async fn register(&self, username: &str, password: &str) -> (i64, String) {
        let (status, body) = self
            .request(
                Method::POST,
                "/auth/register",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

        (
            body["data"]["user"]["id"].as_i64().unwrap(),
            body["data"]["token"].as_str().unwrap().to_string(),
        )
    }
}

/// Sends one request through `router` and decodes the JSON body
/// (`Value::Null` when the body is empty).
pub async fn send(
    router: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    send_request(router, request).await
}

pub async fn send_request(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}
