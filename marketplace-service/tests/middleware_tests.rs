mod common;

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use auth::TokenManager;
use axum::body::Body;
use axum::extract::Request;
use axum::http::header;
use axum::http::Method;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::get;
use axum::Json;
use axum::Router;
use chrono::Duration;
use common::send;
use common::send_request;
use common::TestApp;
use common::TEST_SECRET;
use marketplace_service::inbound::http::middleware::get_user_id;
use marketplace_service::inbound::http::middleware::optional_auth;
use marketplace_service::inbound::http::middleware::require_auth;
use marketplace_service::inbound::http::middleware::AuthPolicy;
use serde_json::json;
use serde_json::Value;

/// Router with a single `/probe` route behind the given policy. The probe
/// reports what `get_user_id` sees and counts its invocations.
fn probe_router(app: &TestApp, policy: AuthPolicy) -> (Router, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    let probe = get(move |req: Request| {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            let user_id = get_user_id(req.extensions());
            Json(json!({
                "user_id": user_id.map(|id| id.as_i64()),
                "authenticated": user_id.is_some(),
            }))
        }
    });

    let layer = match policy {
        AuthPolicy::Required => Router::new()
            .route("/probe", probe)
            .route_layer(middleware::from_fn_with_state(app.state.clone(), require_auth)),
        AuthPolicy::Optional => Router::new()
            .route("/probe", probe)
            .route_layer(middleware::from_fn_with_state(app.state.clone(), optional_auth)),
    };

    (layer, hits)
}

async fn probe(router: Router, token: Option<&str>) -> (StatusCode, Value) {
    send(router, Method::GET, "/probe", token, None).await
}

#[tokio::test]
async fn test_required_without_header_never_reaches_handler() {
    let app = TestApp::new();
    let (router, hits) = probe_router(&app, AuthPolicy::Required);

    let (status, body) = probe(router, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["data"]["message"], "unauthorized");
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_required_with_valid_token_exposes_user_id() {
    let app = TestApp::new();
    let token = app.token_manager.issue(7).unwrap();
    let (router, hits) = probe_router(&app, AuthPolicy::Required);

    let (status, body) = probe(router, Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], 7);
    assert_eq!(body["authenticated"], true);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_optional_without_header_is_anonymous() {
    let app = TestApp::new();
    let (router, hits) = probe_router(&app, AuthPolicy::Optional);

    let (status, body) = probe(router, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], Value::Null);
    assert_eq!(body["authenticated"], false);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_optional_with_valid_token_exposes_user_id() {
    let app = TestApp::new();
    let token = app.token_manager.issue(42).unwrap();
    let (router, _) = probe_router(&app, AuthPolicy::Optional);

    let (status, body) = probe(router, Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], 42);
    assert_eq!(body["authenticated"], true);
}

#[tokio::test]
async fn test_non_bearer_scheme_is_rejected_under_both_policies() {
    let app = TestApp::new();

    for policy in [AuthPolicy::Required, AuthPolicy::Optional] {
        let (router, hits) = probe_router(&app, policy);
        let request = axum::http::Request::builder()
            .uri("/probe")
            .header(header::AUTHORIZATION, "Basic xyz")
            .body(Body::empty())
            .unwrap();

        let (status, _) = send_request(router, request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "policy {policy:?}");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn test_expired_and_foreign_tokens_are_rejected() {
    let app = TestApp::new();
    let expired = TokenManager::new(TEST_SECRET, Duration::seconds(-1))
        .issue(7)
        .unwrap();
    let foreign = TokenManager::new(b"some-other-secret", Duration::minutes(15))
        .issue(7)
        .unwrap();

    for policy in [AuthPolicy::Required, AuthPolicy::Optional] {
        for token in [&expired, &foreign] {
            let (router, hits) = probe_router(&app, policy);
            let (status, _) = probe(router, Some(token)).await;

            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(hits.load(Ordering::SeqCst), 0);
        }
    }
}

#[tokio::test]
async fn test_bearer_without_token_is_rejected() {
    let app = TestApp::new();
    let (router, hits) = probe_router(&app, AuthPolicy::Optional);
    let request = axum::http::Request::builder()
        .uri("/probe")
        .header(header::AUTHORIZATION, "Bearer ")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send_request(router, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}
