//! Role-based request authorization for Rolegate.
//!
//! Provides:
//! - [`Identity`] / [`Role`] / [`Permission`] — Per-request identity and its role grant
//! - [`PermissionStore`] — Trait over the relational store (implement per backend)
//! - [`Authorizer`] — Resolve, load and decide without any HTTP plumbing
//! - [`RoleLayer`] / [`RoleService`] — Tower middleware parameterised over a [`Skipper`]
//! - [`RoleConfig`] — Configuration for the middleware
//! - [`AuthzError`] — Authorization outcomes that reject a request
//!
//! Per request the middleware reads the caller id from the `userId` header,
//! looks the identity up, loads the permissions granted to its role, derives
//! `<action>-<resource>` from the HTTP method and the route, and either
//! forwards the request with the [`Identity`] in its extensions or rejects it
//! with 401, 403 or 500.

mod authorizer;
mod context;
pub mod decision;
mod error;
mod loader;
mod middleware;
mod model;
mod resolver;
pub mod skip;
pub mod store;

use http::HeaderName;

pub use authorizer::Authorizer;
pub use context::{identity_from_parts, identity_from_request, route_path};
pub use decision::{Action, Decision, PermissionKey, PermissionSet, decide};
pub use error::AuthzError;
pub use loader::load_permissions;
pub use middleware::{RoleLayer, RoleService};
pub use model::{Identity, Permission, Role};
pub use resolver::resolve_identity;
pub use skip::{NeverSkip, SkipPaths, Skipper};
pub use store::{IdentityRow, MemoryStore, PermissionPages, PermissionStore, StoreError};

/// Header carrying the caller's identifier (`userId`; header names are case-insensitive).
pub const DEFAULT_IDENTITY_HEADER: &str = "userid";

/// Number of permission rows fetched per page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Configuration for the role middleware.
#[derive(Clone, Debug)]
pub struct RoleConfig {
    /// Request header holding the caller id. Trusted as-is.
    pub header: HeaderName,
    /// Rows per permission page. Zero is treated as one.
    pub page_size: usize,
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            header: HeaderName::from_static(DEFAULT_IDENTITY_HEADER),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl RoleConfig {
    /// Use a different identity header.
    pub fn with_header(mut self, header: HeaderName) -> Self {
        self.header = header;
        self
    }

    /// Use a different permission page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}
