//! Middleware pipeline
//!
//! A middleware receives the request and a [`Next`] continuation. Calling
//! `next(request).await` runs the rest of the chain (and finally the route
//! handler); returning without calling it short-circuits the request.
//!
//! # Example
//!
//! ```rust,ignore
//! use reqbind::{async_trait, HttpResponse, Middleware, Next, Request, Response};
//!
//! pub struct RequireJson;
//!
//! #[async_trait]
//! impl Middleware for RequireJson {
//!     async fn handle(&self, request: Request, next: Next) -> Response {
//!         if request.content_type() != Some("application/json") {
//!             return Err(HttpResponse::text("expected JSON").status(415));
//!         }
//!         next(request).await
//!     }
//! }
//! ```

mod registry;

pub use registry::MiddlewareRegistry;

use crate::http::{Request, Response};
use crate::routing::BoxedHandler;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Continuation that runs the remainder of the middleware chain
pub type Next = Arc<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync>;

/// Request middleware
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, request: Request, next: Next) -> Response;
}

/// Shared, type-erased middleware
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// Box a middleware for storage in routers and registries
pub fn into_boxed<M: Middleware + 'static>(middleware: M) -> BoxedMiddleware {
    Arc::new(middleware)
}

/// Ordered middleware for a single request
#[derive(Default)]
pub struct MiddlewareChain {
    middleware: Vec<BoxedMiddleware>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, middleware: BoxedMiddleware) {
        self.middleware.push(middleware);
    }

    pub fn extend(&mut self, middleware: impl IntoIterator<Item = BoxedMiddleware>) {
        self.middleware.extend(middleware);
    }

    /// Run the chain, first-added middleware outermost, ending at `handler`
    pub async fn execute(self, request: Request, handler: Arc<BoxedHandler>) -> Response {
        let mut next: Next = Arc::new(move |req: Request| (handler.as_ref())(req));

        for middleware in self.middleware.into_iter().rev() {
            let inner = next;
            next = Arc::new(
                move |req: Request| -> Pin<Box<dyn Future<Output = Response> + Send>> {
                    let middleware = middleware.clone();
                    let inner = inner.clone();
                    Box::pin(async move { middleware.handle(req, inner).await })
                },
            );
        }

        next(request).await
    }
}
