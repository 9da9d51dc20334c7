//! PostgreSQL store implementation

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use rolegate_auth::{IdentityRow, Permission, PermissionPages, PermissionStore, StoreError};

use crate::error::{Error, Result};

// Ids are compared and returned as text so integer and uuid keys decode too.

/// Identity joined to its role, by identity id.
pub const IDENTITY_QUERY: &str = "\
SELECT u.id::text, u.name, u.email, r.id::text, r.name \
FROM users AS u \
INNER JOIN roles AS r ON r.id = u.role_id \
WHERE u.id::text = $1";

/// Permissions reachable from the identity's role, by identity id.
pub const PERMISSIONS_QUERY: &str = "\
SELECT p.id::text, p.action, p.resource \
FROM users AS u \
INNER JOIN roles AS r ON r.id = u.role_id \
JOIN role_policies AS rp ON rp.role_id = r.id \
JOIN permissions AS p ON p.id = rp.permission_id \
WHERE u.id::text = $1";

type IdentityTuple = (String, String, String, String, String);

/// Tuning for [`PostgresStore`].
#[derive(Clone, Debug)]
pub struct PostgresStoreConfig {
    /// Upper bound for the identity query and for each permission page.
    /// `None` leaves queries bounded only by the request's own lifetime.
    pub query_timeout: Option<Duration>,
    /// Pool size.
    pub max_connections: u32,
    /// How long to wait for a free pooled connection.
    pub acquire_timeout: Duration,
}

impl Default for PostgresStoreConfig {
    fn default() -> Self {
        Self {
            query_timeout: Some(Duration::from_secs(5)),
            max_connections: 25,
            acquire_timeout: Duration::from_secs(3),
        }
    }
}

/// [`PermissionStore`] backed by a PostgreSQL connection pool.
///
/// The pool is shared by every request; each call checks a connection out
/// for the duration of its query only.
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
    config: PostgresStoreConfig,
}

impl PostgresStore {
    /// Wrap an existing pool.
    pub fn new(pool: PgPool, config: PostgresStoreConfig) -> Self {
        Self { pool, config }
    }

    /// Open a pool with `options` and wrap it.
    pub async fn connect(options: PgConnectOptions, config: PostgresStoreConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(Error::Connect)?;
        log::info!(
            "Connected to database (max {} connections)",
            config.max_connections
        );
        Ok(Self::new(pool, config))
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(Error::Ping)?;
        Ok(())
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn bounded<T, F>(&self, query: F) -> std::result::Result<T, StoreError>
    where
        F: Future<Output = std::result::Result<T, sqlx::Error>>,
    {
        match self.config.query_timeout {
            Some(limit) => tokio::time::timeout(limit, query)
                .await
                .map_err(|_| StoreError::Timeout(limit))?
                .map_err(StoreError::backend),
            None => query.await.map_err(StoreError::backend),
        }
    }
}

#[async_trait]
impl PermissionStore for PostgresStore {
    async fn find_identity(
        &self,
        user_id: &str,
    ) -> std::result::Result<Option<IdentityRow>, StoreError> {
        let query = sqlx::query_as::<_, IdentityTuple>(IDENTITY_QUERY)
            .bind(user_id)
            .fetch_optional(&self.pool);

        let row = self.bounded(query).await?;
        Ok(row.map(|(id, name, email, role_id, role_name)| IdentityRow {
            id,
            name,
            email,
            role_id,
            role_name,
        }))
    }

    fn permission_pages<'a>(&'a self, user_id: &'a str, page_size: usize) -> PermissionPages<'a> {
        let pages = sqlx::query_as::<_, (String, String, String)>(PERMISSIONS_QUERY)
            .bind(user_id)
            .fetch(&self.pool)
            .map_ok(|(id, action, resource)| Permission::new(id, action, resource))
            .map_err(StoreError::backend)
            .try_chunks(page_size.max(1))
            .map_err(|partial| partial.1);

        match self.config.query_timeout {
            Some(limit) => tokio_stream::StreamExt::timeout(pages, limit)
                .map(move |page| page.unwrap_or(Err(StoreError::Timeout(limit))))
                .boxed(),
            None => pages.boxed(),
        }
    }
}
