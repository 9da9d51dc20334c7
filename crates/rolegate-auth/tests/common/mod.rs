//! Common fixtures for the role middleware integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::routing::get;
use http::{Method, Request, StatusCode};
use rolegate_auth::{Identity, MemoryStore, Permission, RoleConfig, RoleLayer, SkipPaths};
use tower::ServiceExt;

/// Store with the identities used across scenarios.
///
/// - `u1` (registrar): `create-enrollments`, `read-courses`
/// - `u2` (guest): no permissions
/// - `u3` (auditor): 250 `read` grants, `read-enrollments` last
pub fn school_store() -> MemoryStore {
    let mut store = MemoryStore::new()
        .with_identity("u1", "Alice", "alice@example.com", "r1", "registrar")
        .with_identity("u2", "Bob", "bob@example.com", "r2", "guest")
        .with_identity("u3", "Carol", "carol@example.com", "r3", "auditor")
        .with_grant("r1", Permission::new("p1", "create", "enrollments"))
        .with_grant("r1", Permission::new("p2", "read", "courses"));
    for i in 0..249 {
        store = store.with_grant(
            "r3",
            Permission::new(format!("a{i}"), "read", format!("report{i}")),
        );
    }
    store.with_grant("r3", Permission::new("a249", "read", "enrollments"))
}

async fn whoami(identity: Identity) -> String {
    format!("{}:{}", identity.id, identity.role.permissions().len())
}

async fn greeting() -> &'static str {
    "Hello, World!"
}

/// Demo routes behind the role middleware; `/greeting` is skipped and
/// unrouted paths fall through to a plain 404.
pub fn app(store: Arc<MemoryStore>) -> Router {
    let layer = RoleLayer::new(store, RoleConfig::default())
        .with_skipper(SkipPaths::new(["/greeting"]));

    Router::new()
        .route("/v1/enrollments", get(whoami).post(whoami).options(whoami))
        .route("/v1/enrollments/{id}", get(whoami).put(whoami).delete(whoami))
        .route("/greeting", get(greeting))
        .route_layer(layer)
}

/// Send one request and return status and body text.
pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    user: Option<&str>,
) -> (StatusCode, String) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("userId", user);
    }
    let resp = app
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}
