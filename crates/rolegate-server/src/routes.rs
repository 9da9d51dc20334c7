//! HTTP routes.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use rolegate_auth::{Identity, PermissionStore, RoleLayer};
use tower_http::trace::TraceLayer;

use crate::config::AuthorizationSettings;
use crate::error::Result;

/// Build the application router.
///
/// Every route runs behind the role middleware; paths listed in
/// `skip_paths` bypass it. Unrouted paths answer 404 without touching the
/// store.
pub fn router(
    store: Arc<dyn PermissionStore>,
    settings: &AuthorizationSettings,
) -> Result<Router> {
    let roles = RoleLayer::new(store, settings.role_config()?)
        .with_skipper(settings.skipper());

    Ok(Router::new()
        .route(
            "/v1/enrollments",
            get(list_enrollments).post(create_enrollment),
        )
        .route("/greeting", get(greeting))
        .route_layer(roles)
        .layer(TraceLayer::new_for_http()))
}

async fn list_enrollments(identity: Identity) -> &'static str {
    tracing::info!(user = %identity.id, role = %identity.role.name, "listing enrollments");
    "Hello, World!"
}

async fn create_enrollment(identity: Identity) -> &'static str {
    tracing::info!(user = %identity.id, role = %identity.role.name, "creating enrollment");
    "Hello, World!"
}

async fn greeting() -> &'static str {
    "Hello, World!"
}
