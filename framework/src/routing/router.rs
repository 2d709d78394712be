use crate::http::{Request, Response};
use crate::middleware::{into_boxed, BoxedMiddleware, Middleware};
use matchit::Router as MatchitRouter;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// HTTP methods the router dispatches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn from_http(method: &http::Method) -> Option<Self> {
        match *method {
            http::Method::GET => Some(Self::Get),
            http::Method::POST => Some(Self::Post),
            http::Method::PUT => Some(Self::Put),
            http::Method::DELETE => Some(Self::Delete),
            _ => None,
        }
    }
}

/// Type alias for route handlers
pub type BoxedHandler =
    Box<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync>;

/// A registered route: its handler and the pattern it was registered under
struct RouteEntry {
    handler: Arc<BoxedHandler>,
    pattern: String,
}

/// A matched route
pub struct RouteMatch {
    pub handler: Arc<BoxedHandler>,
    pub params: HashMap<String, String>,
    pub middleware: Vec<BoxedMiddleware>,
}

/// HTTP Router with per-route middleware
///
/// Patterns use `matchit` syntax: `/item/{id}`.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<Arc<RouteEntry>>>,
    /// Middleware assignments: (method, pattern) -> boxed middleware instances
    route_middleware: HashMap<(Method, String), Vec<BoxedMiddleware>>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            route_middleware: HashMap::new(),
        }
    }

    fn insert<H, Fut>(mut self, method: Method, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let handler: BoxedHandler = Box::new(
            move |req: Request| -> Pin<Box<dyn Future<Output = Response> + Send>> {
                Box::pin(handler(req))
            },
        );
        let entry = Arc::new(RouteEntry {
            handler: Arc::new(handler),
            pattern: path.to_string(),
        });
        let routes = self.routes.entry(method).or_insert_with(MatchitRouter::new);
        if let Err(e) = routes.insert(path, entry) {
            tracing::error!(path, error = %e, "route registration failed");
        }
        RouteBuilder {
            router: self,
            last_path: path.to_string(),
            last_method: method,
        }
    }

    /// Register a GET route
    pub fn get<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.insert(Method::Get, path, handler)
    }

    /// Register a POST route
    pub fn post<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.insert(Method::Post, path, handler)
    }

    /// Register a PUT route
    pub fn put<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.insert(Method::Put, path, handler)
    }

    /// Register a DELETE route
    pub fn delete<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.insert(Method::Delete, path, handler)
    }

    /// Match a request and return the handler, extracted params and route middleware
    pub fn match_route(&self, method: &http::Method, path: &str) -> Option<RouteMatch> {
        let method = Method::from_http(method)?;
        let matched = self.routes.get(&method)?.at(path).ok()?;

        let params: HashMap<String, String> = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let middleware = self
            .route_middleware
            .get(&(method, matched.value.pattern.clone()))
            .cloned()
            .unwrap_or_default();

        Some(RouteMatch {
            handler: matched.value.handler.clone(),
            params,
            middleware,
        })
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder returned after registering a route, enabling `.middleware()` chaining
pub struct RouteBuilder {
    pub(crate) router: Router,
    last_path: String,
    last_method: Method,
}

impl RouteBuilder {
    /// Apply middleware to the most recently registered route
    ///
    /// Middleware runs in the order it is attached.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// Router::new()
    ///     .get("/items", list_items)
    ///     .middleware(Bind::<ItemQuery>::new(BindConfig::new().source(Source::Query)))
    /// ```
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> RouteBuilder {
        self.router
            .route_middleware
            .entry((self.last_method, self.last_path.clone()))
            .or_default()
            .push(into_boxed(middleware));
        self
    }

    /// Register a GET route (for chaining)
    pub fn get<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.get(path, handler)
    }

    /// Register a POST route (for chaining)
    pub fn post<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.post(path, handler)
    }

    /// Register a PUT route (for chaining)
    pub fn put<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.put(path, handler)
    }

    /// Register a DELETE route (for chaining)
    pub fn delete<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.delete(path, handler)
    }
}

impl From<RouteBuilder> for Router {
    fn from(builder: RouteBuilder) -> Self {
        builder.router
    }
}
