//! Resource derivation through the router.

use std::sync::Arc;

use http::{Method, StatusCode};

use crate::common::{app, school_store, send};

#[tokio::test]
async fn test_nested_path_uses_resource_segment() {
    // `read-enrollments` is not granted to u1, `read-courses` is
    let (status, _) = send(
        app(Arc::new(school_store())),
        Method::GET,
        "/v1/enrollments/42",
        Some("u1"),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_put_requires_update() {
    let (status, _) = send(
        app(Arc::new(school_store())),
        Method::PUT,
        "/v1/enrollments/42",
        Some("u1"),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_each_request_queries_the_store_again() {
    let store = Arc::new(school_store());
    for _ in 0..3 {
        let (status, _) =
            send(app(store.clone()), Method::POST, "/v1/enrollments", Some("u1")).await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(store.calls(), 6);
}

#[tokio::test]
async fn test_unrouted_paths_are_not_found_without_store_calls() {
    let store = Arc::new(school_store());

    let (status, _) = send(app(store.clone()), Method::GET, "/nope", Some("u1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(app(store.clone()), Method::GET, "/v1/nothing", Some("ghost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(store.calls(), 0);
}
