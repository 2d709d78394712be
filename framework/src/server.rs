use crate::config::ServerConfig;
use crate::http::{collect_body, HttpResponse, Request};
use crate::middleware::{Middleware, MiddlewareChain, MiddlewareRegistry};
use crate::routing::Router;
use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct Server {
    router: Arc<Router>,
    middleware: MiddlewareRegistry,
    config: ServerConfig,
}

impl Server {
    pub fn new(router: impl Into<Router>) -> Self {
        Self::with_config(router, ServerConfig::default())
    }

    /// Create a server reading host, port and body limit from the environment
    pub fn from_config(router: impl Into<Router>) -> Self {
        Self::with_config(router, ServerConfig::from_env())
    }

    pub fn with_config(router: impl Into<Router>, config: ServerConfig) -> Self {
        Self {
            router: Arc::new(router.into()),
            middleware: MiddlewareRegistry::new(),
            config,
        }
    }

    /// Add global middleware (runs on every request)
    ///
    /// For route-specific middleware, use `.middleware(M)` on the route itself.
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware = self.middleware.append(middleware);
        self
    }

    pub fn host(mut self, host: &str) -> Self {
        self.config.host = host.to_string();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr: SocketAddr = self.config.socket_addr()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!(%addr, "server listening");

        let router = self.router;
        let middleware = Arc::new(self.middleware);
        let max_body_size = self.config.max_body_size;

        loop {
            let (stream, _) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let router = router.clone();
            let middleware = middleware.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: hyper::Request<hyper::body::Incoming>| {
                    let router = router.clone();
                    let middleware = middleware.clone();
                    async move {
                        Ok::<_, Infallible>(
                            handle_request(router, middleware, req, max_body_size).await,
                        )
                    }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::error!(error = ?err, "error serving connection");
                }
            });
        }
    }
}

async fn handle_request(
    router: Arc<Router>,
    middleware: Arc<MiddlewareRegistry>,
    req: hyper::Request<hyper::body::Incoming>,
    max_body_size: usize,
) -> hyper::Response<Full<Bytes>> {
    let (parts, body) = req.into_parts();
    let body = match collect_body(body, max_body_size).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(path = %parts.uri.path(), error = %err, "rejected request body");
            return HttpResponse::from(err).into_hyper();
        }
    };

    dispatch(&router, &middleware, http::Request::from_parts(parts, body))
        .await
        .into_hyper()
}

/// Route a buffered request through global and route middleware to its handler
pub(crate) async fn dispatch(
    router: &Router,
    middleware_registry: &MiddlewareRegistry,
    req: http::Request<Bytes>,
) -> HttpResponse {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    match router.match_route(&method, &path) {
        Some(matched) => {
            let request = Request::new(req).with_params(matched.params);

            let mut chain = MiddlewareChain::new();
            chain.extend(middleware_registry.global_middleware().iter().cloned());
            chain.extend(matched.middleware);

            // Both Ok and Err carry an HttpResponse
            let response = chain.execute(request, matched.handler).await;
            let response = response.unwrap_or_else(|e| e);
            tracing::debug!(%method, %path, status = response.status_code(), "request handled");
            response
        }
        None => HttpResponse::text("404 Not Found").status(404),
    }
}
