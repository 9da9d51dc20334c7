//! # rolegate-server
//!
//! Bootstrap for the Rolegate demo service: configuration, the
//! `/v1/enrollments` routes behind [`rolegate_auth::RoleLayer`], and graceful
//! shutdown.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod routes;
pub mod shutdown;

pub use config::{Args, AuthorizationSettings, Settings};
pub use error::{Error, Result};
pub use routes::router;
