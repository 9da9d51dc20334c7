//! End-to-end authorization scenarios.

use std::sync::Arc;

use http::{Method, StatusCode};
use rolegate_auth::MemoryStore;

use crate::common::{app, school_store, send};

#[tokio::test]
async fn test_permitted_create_reaches_handler() {
    let (status, body) = send(
        app(Arc::new(school_store())),
        Method::POST,
        "/v1/enrollments",
        Some("u1"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "u1:2");
}

#[tokio::test]
async fn test_empty_role_is_forbidden() {
    let (status, body) = send(
        app(Arc::new(school_store())),
        Method::GET,
        "/v1/enrollments",
        Some("u2"),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["error"]["message"], "access denied");
}

#[tokio::test]
async fn test_unknown_identity_is_unauthorized_for_any_request() {
    let store = Arc::new(school_store());
    for (method, uri) in [
        (Method::GET, "/v1/enrollments"),
        (Method::POST, "/v1/enrollments"),
        (Method::DELETE, "/v1/enrollments/9"),
        (Method::OPTIONS, "/v1/enrollments"),
    ] {
        let (status, body) = send(app(store.clone()), method, uri, Some("ghost")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("unauthorized"));
    }
}

#[tokio::test]
async fn test_unmapped_method_is_forbidden() {
    let (status, _) = send(
        app(Arc::new(school_store())),
        Method::OPTIONS,
        "/v1/enrollments",
        Some("u1"),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_mid_batch_failure_is_internal_error() {
    let store = Arc::new(school_store().failing_after_pages(1));
    let (status, body) = send(app(store), Method::GET, "/v1/enrollments", Some("u3")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("internal server error"));
    assert!(!body.contains("connection reset"));
}

#[tokio::test]
async fn test_lookup_failure_is_internal_error() {
    let store = Arc::new(school_store().failing_lookups());
    let (status, _) = send(app(store), Method::GET, "/v1/enrollments", Some("u1")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_grant_on_last_page_is_found() {
    let (status, body) = send(
        app(Arc::new(school_store())),
        Method::GET,
        "/v1/enrollments",
        Some("u3"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "u3:250");
}

#[tokio::test]
async fn test_skipped_route_makes_no_store_calls() {
    let store = Arc::new(MemoryStore::new());
    let (status, body) = send(app(store.clone()), Method::GET, "/greeting", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Hello, World!");
    assert_eq!(store.calls(), 0);
}
