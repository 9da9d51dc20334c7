//! Identity propagation through request extensions.

use axum::extract::{FromRequestParts, MatchedPath};
use http::Request;
use http::request::Parts;

use crate::error::AuthzError;
use crate::model::Identity;

/// The [`Identity`] attached by the role middleware, if the request was authorized.
pub fn identity_from_parts(parts: &Parts) -> Option<&Identity> {
    parts.extensions.get::<Identity>()
}

/// Same as [`identity_from_parts`], for a whole request.
pub fn identity_from_request<B>(req: &Request<B>) -> Option<&Identity> {
    req.extensions().get::<Identity>()
}

/// Attach `identity`, replacing any identity already present.
pub(crate) fn attach<B>(req: &mut Request<B>, identity: Identity) {
    req.extensions_mut().insert(identity);
}

/// The route template the request matched (e.g. `/v1/enrollments/{id}`),
/// or the raw URI path when routing has not run.
pub fn route_path<B>(req: &Request<B>) -> &str {
    req.extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or_else(|| req.uri().path())
}

/// Handlers behind the role middleware can take `Identity` as an extractor.
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthzError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        identity_from_parts(parts)
            .cloned()
            .ok_or(AuthzError::NotAttached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    fn identity() -> Identity {
        Identity {
            id: "u1".to_string(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::new("r1", "registrar"),
        }
    }

    #[test]
    fn test_identity_from_parts_present() {
        let mut req = Request::new(());
        attach(&mut req, identity());
        let (parts, _body) = req.into_parts();
        assert_eq!(identity_from_parts(&parts).unwrap().id, "u1");
    }

    #[test]
    fn test_identity_from_parts_absent() {
        let (parts, _body) = Request::new(()).into_parts();
        assert!(identity_from_parts(&parts).is_none());
    }

    #[test]
    fn test_attach_replaces_previous() {
        let mut req = Request::new(());
        attach(&mut req, Identity::default());
        attach(&mut req, identity());
        assert_eq!(identity_from_request(&req).unwrap().name, "Alice");
    }

    #[test]
    fn test_route_path_falls_back_to_uri() {
        let req = Request::builder()
            .uri("/v1/enrollments/7?page=2")
            .body(())
            .unwrap();
        assert_eq!(route_path(&req), "/v1/enrollments/7");
    }

    #[tokio::test]
    async fn test_extractor_rejects_without_identity() {
        let (mut parts, _body) = Request::new(()).into_parts();
        let err = Identity::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, AuthzError::NotAttached));
    }

    #[tokio::test]
    async fn test_extractor_returns_identity() {
        let mut req = Request::new(());
        attach(&mut req, identity());
        let (mut parts, _body) = req.into_parts();
        let found = Identity::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(found.email, "alice@example.com");
    }
}
