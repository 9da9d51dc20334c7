//! Predicates that let a request bypass authorization.

use std::collections::HashSet;

use axum::body::Body;
use http::Request;

use crate::context::route_path;

/// Decides whether a request skips the role middleware entirely.
///
/// Skipped requests are forwarded untouched and cost no store query.
/// Closures `Fn(&Request<Body>) -> bool` implement this trait.
pub trait Skipper: Send + Sync + 'static {
    /// Return `true` to bypass authorization for `req`.
    fn skip(&self, req: &Request<Body>) -> bool;

    /// Skip when either `self` or `other` does.
    fn or<O: Skipper>(self, other: O) -> Or<Self, O>
    where
        Self: Sized,
    {
        Or(self, other)
    }
}

impl<F> Skipper for F
where
    F: Fn(&Request<Body>) -> bool + Send + Sync + 'static,
{
    fn skip(&self, req: &Request<Body>) -> bool {
        self(req)
    }
}

/// Never skips. The default.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverSkip;

impl Skipper for NeverSkip {
    fn skip(&self, _req: &Request<Body>) -> bool {
        false
    }
}

/// Skips requests whose route (or raw path, before routing) is one of a fixed set.
#[derive(Clone, Debug, Default)]
pub struct SkipPaths {
    paths: HashSet<String>,
}

impl SkipPaths {
    /// Skip exactly these paths.
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl Skipper for SkipPaths {
    fn skip(&self, req: &Request<Body>) -> bool {
        self.paths.contains(route_path(req))
    }
}

/// See [`Skipper::or`].
#[derive(Clone, Copy, Debug)]
pub struct Or<A, B>(A, B);

impl<A: Skipper, B: Skipper> Skipper for Or<A, B> {
    fn skip(&self, req: &Request<Body>) -> bool {
        self.0.skip(req) || self.1.skip(req)
    }
}
