//! # rolegate-store
//!
//! PostgreSQL permission store for Rolegate.
//!
//! Implements [`rolegate_auth::PermissionStore`] over this schema:
//!
//! ```text
//! users(id, name, email, role_id) ──► roles(id, name)
//!                                        ▲
//! role_policies(role_id, permission_id) ─┘──► permissions(id, action, resource)
//! ```
//!
//! Identifiers are text columns. The identity lookup is a single-row query;
//! permissions are streamed from the connection and handed out in pages, so
//! a large role grant is never buffered by the driver in one piece.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod error;
pub mod postgres;

pub use error::{Error, Result};
pub use postgres::{PostgresStore, PostgresStoreConfig};
