//! The resolve → load → decide pipeline, independent of HTTP plumbing.

use std::sync::Arc;

use http::Method;

use crate::DEFAULT_PAGE_SIZE;
use crate::decision::{Decision, PermissionSet, required_key, resource_from_path};
use crate::error::AuthzError;
use crate::loader::load_permissions;
use crate::model::Identity;
use crate::resolver::resolve_identity;
use crate::store::PermissionStore;

/// Authorizes one request at a time against a shared [`PermissionStore`].
///
/// Holds no per-request state; every call performs its own identity lookup
/// and permission load. Cheap to clone.
#[derive(Clone)]
pub struct Authorizer {
    store: Arc<dyn PermissionStore>,
    page_size: usize,
}

impl Authorizer {
    /// Create an authorizer reading from `store`.
    pub fn new(store: Arc<dyn PermissionStore>) -> Self {
        Self {
            store,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Rows fetched per permission page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Authorize `method` on `path` for `caller_id`.
    ///
    /// On success the returned identity carries its complete permission set.
    /// Any failure rejects the whole request; nothing partial is granted.
    pub async fn authorize(
        &self,
        method: &Method,
        path: &str,
        caller_id: &str,
    ) -> Result<Identity, AuthzError> {
        let mut identity = resolve_identity(self.store.as_ref(), caller_id).await?;
        let permissions =
            load_permissions(self.store.as_ref(), &identity.id, self.page_size).await?;

        if resource_from_path(path).is_none() {
            log::warn!("Route '{path}' has no resource segment; denying {method}");
        }

        match PermissionSet::from_permissions(&permissions).decide(method, path) {
            Decision::Allow => {
                identity.role.populate(permissions);
                Ok(identity)
            }
            Decision::Deny => Err(AuthzError::Denied {
                required: required_key(method, path),
            }),
        }
    }
}
