//! Tower role-based authorization middleware.
//!
//! `RoleLayer` and `RoleService` wrap any inner service with identity
//! resolution, permission loading and the allow/deny decision. Generic over
//! [`Skipper`], so any bypass predicate plugs in.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::IntoResponse;
use http::{HeaderName, Request};
use tower::{Layer, Service};

use crate::RoleConfig;
use crate::authorizer::Authorizer;
use crate::context::{attach, route_path};
use crate::error::AuthzError;
use crate::skip::{NeverSkip, Skipper};
use crate::store::PermissionStore;

/// Tower `Layer` that wraps services with role-based authorization.
pub struct RoleLayer<K: Skipper = NeverSkip> {
    authorizer: Authorizer,
    skipper: Arc<K>,
    header: HeaderName,
}

impl<K: Skipper> Clone for RoleLayer<K> {
    fn clone(&self) -> Self {
        Self {
            authorizer: self.authorizer.clone(),
            skipper: self.skipper.clone(),
            header: self.header.clone(),
        }
    }
}

impl RoleLayer<NeverSkip> {
    /// Create a layer reading identities and permissions from `store`.
    pub fn new(store: Arc<dyn PermissionStore>, config: RoleConfig) -> Self {
        Self {
            authorizer: Authorizer::new(store).with_page_size(config.page_size),
            skipper: Arc::new(NeverSkip),
            header: config.header,
        }
    }
}

impl<K: Skipper> RoleLayer<K> {
    /// Bypass authorization for requests `skipper` selects.
    pub fn with_skipper<K2: Skipper>(self, skipper: K2) -> RoleLayer<K2> {
        RoleLayer {
            authorizer: self.authorizer,
            skipper: Arc::new(skipper),
            header: self.header,
        }
    }
}

impl<K: Skipper, S> Layer<S> for RoleLayer<K> {
    type Service = RoleService<K, S>;

    fn layer(&self, inner: S) -> Self::Service {
        RoleService {
            inner,
            authorizer: self.authorizer.clone(),
            skipper: self.skipper.clone(),
            header: self.header.clone(),
        }
    }
}

/// Tower `Service` that authorizes requests before forwarding them.
///
/// On success, inserts the [`Identity`](crate::Identity) (permissions
/// loaded) into request extensions where downstream handlers can read it.
/// Dropping the returned future, as hyper does when the client goes away,
/// drops any in-flight store query with it.
pub struct RoleService<K: Skipper, S> {
    inner: S,
    authorizer: Authorizer,
    skipper: Arc<K>,
    header: HeaderName,
}

impl<K: Skipper, S: Clone> Clone for RoleService<K, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            authorizer: self.authorizer.clone(),
            skipper: self.skipper.clone(),
            header: self.header.clone(),
        }
    }
}

impl<K, S> Service<Request<Body>> for RoleService<K, S>
where
    K: Skipper,
    S: Service<Request<Body>, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    type Response = axum::response::Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let authorizer = self.authorizer.clone();
        let skipper = self.skipper.clone();
        let header = self.header.clone();

        Box::pin(async move {
            if skipper.skip(&req) {
                let resp = inner
                    .call(req)
                    .await
                    .unwrap_or_else(|infallible| match infallible {});
                return Ok(resp.into_response());
            }

            let caller = match caller_id(&req, &header) {
                Some(id) => id.to_string(),
                None => {
                    log::debug!("Request without usable '{header}' header");
                    return Ok(AuthzError::UnknownIdentity.into_response());
                }
            };

            let method = req.method().clone();
            let path = route_path(&req).to_string();

            match authorizer.authorize(&method, &path, &caller).await {
                Ok(identity) => {
                    attach(&mut req, identity);
                    let resp = inner
                        .call(req)
                        .await
                        .unwrap_or_else(|infallible| match infallible {});
                    Ok(resp.into_response())
                }
                Err(err) => {
                    if err.is_client_error() {
                        log::debug!("{method} {path} rejected for '{caller}': {err}");
                    } else {
                        log::error!("Authorization of {method} {path} failed: {}", err.report());
                    }
                    Ok(err.into_response())
                }
            }
        })
    }
}

/// The caller id from `header`, taken verbatim. Absent or non-UTF-8 yields `None`.
fn caller_id<'r>(req: &'r Request<Body>, header: &HeaderName) -> Option<&'r str> {
    req.headers().get(header).and_then(|v| v.to_str().ok())
}
