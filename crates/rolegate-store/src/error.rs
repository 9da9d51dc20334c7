//! Error types for rolegate-store

use thiserror::Error;

/// Result type alias for rolegate-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up the store.
///
/// Query failures during authorization surface as
/// [`rolegate_auth::StoreError`] instead.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Could not open the connection pool.
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    /// The database did not answer a ping.
    #[error("failed to ping database: {0}")]
    Ping(#[source] sqlx::Error),
}
