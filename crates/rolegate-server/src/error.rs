//! Error types for rolegate-server

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for rolegate-server operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring the server
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`Settings`](crate::Settings).
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The identity header name is not a valid HTTP header name.
    #[error("invalid identity header '{0}'")]
    InvalidHeader(String),

    /// Error from rolegate-store
    #[error("Store error: {0}")]
    Store(#[from] rolegate_store::Error),
}
