use std::collections::HashMap;
use std::str::FromStr;

use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;

use super::ListingData;
use crate::domain::listing::models::ListFilter;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

const MAX_LIMIT: i64 = 100;

pub async fn list_listings(
    State(state): State<AppState>,
    CurrentUser(viewer_id): CurrentUser,
    Query(params): Query<HashMap<String, String>>,
) -> Result<ApiSuccess<Vec<ListingData>>, ApiError> {
    let mut filter = parse_filter(&params);
    filter.viewer_id = viewer_id;

    tracing::debug!(?filter, "Listing feed requested");

    let listings = state.listing_service.list(filter).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to list listings");
        ApiError::InternalServerError("failed to fetch listings".to_string())
    })?;

    tracing::info!(count = listings.len(), "Listings fetched");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        listings.into_iter().map(ListingData::from).collect(),
    ))
}

/// Builds a filter from raw query parameters. Unparseable values fall back to
/// their defaults instead of failing the request.
fn parse_filter(params: &HashMap<String, String>) -> ListFilter {
    let defaults = ListFilter::default();

    ListFilter {
        limit: parse_or(params, "limit", defaults.limit).clamp(1, MAX_LIMIT),
        offset: parse_or(params, "offset", defaults.offset).max(0),
        sort_by: parse_or(params, "sort_by", defaults.sort_by),
        sort_order: parse_or(params, "sort_order", defaults.sort_order),
        price_min: parse_opt(params, "price_min"),
        price_max: parse_opt(params, "price_max"),
        viewer_id: None,
    }
}

fn parse_or<T: FromStr>(params: &HashMap<String, String>, key: &str, default: T) -> T {
    parse_opt(params, key).unwrap_or(default)
}

fn parse_opt<T: FromStr>(params: &HashMap<String, String>, key: &str) -> Option<T> {
    let raw = params.get(key).filter(|v| !v.is_empty())?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(param = key, value = %raw, "Ignoring invalid query parameter");
            None
        }
    }
}
