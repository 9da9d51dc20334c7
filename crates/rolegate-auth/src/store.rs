//! The store queries the middleware depends on.
//!
//! [`PermissionStore`] is the only seam to the relational store: one
//! single-row identity lookup and one paged permission join. Implementations
//! must be safe to share between concurrently running requests.
//!
//! [`MemoryStore`] is an in-process implementation for tests and demos.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};

use crate::model::{Identity, Permission, Role};

/// Pages of permission rows, in retrieval order.
pub type PermissionPages<'a> = BoxStream<'a, Result<Vec<Permission>, StoreError>>;

/// Store access failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend rejected or failed the query.
    #[error("store backend error")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The query did not finish in time.
    #[error("store query timed out after {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    /// Wrap a backend error.
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        StoreError::Backend(err.into())
    }
}

/// One row of the identity lookup: `users` joined to `roles`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role_id: String,
    pub role_name: String,
}

impl From<IdentityRow> for Identity {
    fn from(row: IdentityRow) -> Self {
        Identity {
            id: row.id,
            name: row.name,
            email: row.email,
            role: Role::new(row.role_id, row.role_name),
        }
    }
}

/// Read access to identities and their role-derived permissions.
#[async_trait]
pub trait PermissionStore: Send + Sync + 'static {
    /// Look up the identity with `user_id` together with its role.
    ///
    /// `Ok(None)` when no row matches.
    async fn find_identity(&self, user_id: &str) -> Result<Option<IdentityRow>, StoreError>;

    /// Stream every permission reachable from the identity's role through
    /// the role-policy association, at most `page_size` rows per page.
    fn permission_pages<'a>(&'a self, user_id: &'a str, page_size: usize) -> PermissionPages<'a>;
}

/// In-memory [`PermissionStore`].
///
/// Identities reference roles by id, and roles carry their grants, mirroring
/// the `users → roles → role_policies → permissions` layout. Failures can be
/// injected to exercise the error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    identities: HashMap<String, IdentityRow>,
    grants: HashMap<String, Vec<Permission>>,
    fail_lookups: bool,
    fail_after_pages: Option<usize>,
    calls: AtomicUsize,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identity with the given role.
    pub fn with_identity(
        mut self,
        id: &str,
        name: &str,
        email: &str,
        role_id: &str,
        role_name: &str,
    ) -> Self {
        self.identities.insert(
            id.to_string(),
            IdentityRow {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                role_id: role_id.to_string(),
                role_name: role_name.to_string(),
            },
        );
        self
    }

    /// Grant `permission` to the role `role_id`.
    pub fn with_grant(mut self, role_id: &str, permission: Permission) -> Self {
        self.grants
            .entry(role_id.to_string())
            .or_default()
            .push(permission);
        self
    }

    /// Make every identity lookup fail.
    pub fn failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    /// Fail the permission stream after `pages` pages have been yielded.
    pub fn failing_after_pages(mut self, pages: usize) -> Self {
        self.fail_after_pages = Some(pages);
        self
    }

    /// Number of queries issued against this store so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionStore for MemoryStore {
    async fn find_identity(&self, user_id: &str) -> Result<Option<IdentityRow>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups {
            return Err(StoreError::backend("connection refused"));
        }
        Ok(self.identities.get(user_id).cloned())
    }

    fn permission_pages<'a>(&'a self, user_id: &'a str, page_size: usize) -> PermissionPages<'a> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let rows = self
            .identities
            .get(user_id)
            .and_then(|identity| self.grants.get(&identity.role_id))
            .map(Vec::as_slice)
            .unwrap_or_default();

        let mut pages: Vec<Result<Vec<Permission>, StoreError>> = rows
            .chunks(page_size.max(1))
            .map(|chunk| Ok(chunk.to_vec()))
            .collect();

        if let Some(limit) = self.fail_after_pages {
            pages.truncate(limit);
            pages.push(Err(StoreError::backend("connection reset by peer")));
        }

        stream::iter(pages).boxed()
    }
}
