//! Authorization error types.

use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::decision::PermissionKey;
use crate::store::StoreError;

/// Reasons a request is not forwarded.
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// No identity matches the caller id (or none was supplied).
    #[error("unknown identity")]
    UnknownIdentity,

    /// The identity lookup itself failed.
    #[error("identity lookup failed")]
    LookupFailed(#[source] StoreError),

    /// Loading the permission set failed; nothing loaded so far is used.
    #[error("permission load failed")]
    LoadFailed(#[source] StoreError),

    /// The permission set lacks the required key. `None` when no key could
    /// be derived from the method and path.
    #[error("access denied")]
    Denied { required: Option<PermissionKey> },

    /// A handler asked for the identity on a request the middleware never
    /// authorized.
    #[error("no identity attached to request")]
    NotAttached,
}

impl AuthzError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AuthzError::UnknownIdentity => StatusCode::UNAUTHORIZED,
            AuthzError::Denied { .. } => StatusCode::FORBIDDEN,
            AuthzError::LookupFailed(_) | AuthzError::LoadFailed(_) | AuthzError::NotAttached => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether this is an expected negative outcome (401/403) rather than a
    /// server-side failure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AuthzError::UnknownIdentity | AuthzError::Denied { .. })
    }

    /// Message returned to the caller. Store causes are never included.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthzError::UnknownIdentity => "unauthorized",
            AuthzError::Denied { .. } => "access denied",
            _ => "internal server error",
        }
    }

    /// This error and every cause beneath it, joined for logging.
    pub fn report(&self) -> String {
        let mut report = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            report.push_str(": ");
            report.push_str(&cause.to_string());
            source = cause.source();
        }
        report
    }

    fn category(&self) -> &'static str {
        match self {
            AuthzError::UnknownIdentity => "authentication",
            AuthzError::Denied { .. } => "authorization",
            _ => "internal",
        }
    }
}

impl IntoResponse for AuthzError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": {
                "category": self.category(),
                "message": self.public_message(),
            }
        });

        (
            self.status(),
            [(http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
