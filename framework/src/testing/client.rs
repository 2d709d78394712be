use super::MultipartBody;
use crate::http::HttpResponse;
use crate::middleware::{Middleware, MiddlewareRegistry};
use crate::routing::Router;
use crate::server::dispatch;
use bytes::Bytes;
use serde::Serialize;

/// In-process client that sends requests through a router without a socket
///
/// Requests go through the same global and route middleware a running
/// [`Server`](crate::Server) would apply.
///
/// # Example
///
/// ```rust,ignore
/// let client = TestClient::new(routes());
/// let response = client
///     .post("/people")
///     .json(&serde_json::json!({ "name": "John", "age": 20 }))
///     .send()
///     .await;
/// expect!(&response).to_have_status(200);
/// ```
pub struct TestClient {
    router: Router,
    middleware: MiddlewareRegistry,
}

impl TestClient {
    pub fn new(router: impl Into<Router>) -> Self {
        Self {
            router: router.into(),
            middleware: MiddlewareRegistry::new(),
        }
    }

    /// Add global middleware
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware = self.middleware.append(middleware);
        self
    }

    pub fn get(&self, uri: &str) -> TestRequest<'_> {
        self.request(http::Method::GET, uri)
    }

    pub fn post(&self, uri: &str) -> TestRequest<'_> {
        self.request(http::Method::POST, uri)
    }

    pub fn put(&self, uri: &str) -> TestRequest<'_> {
        self.request(http::Method::PUT, uri)
    }

    pub fn delete(&self, uri: &str) -> TestRequest<'_> {
        self.request(http::Method::DELETE, uri)
    }

    pub fn request(&self, method: http::Method, uri: &str) -> TestRequest<'_> {
        TestRequest {
            client: self,
            builder: http::Request::builder().method(method).uri(uri),
            body: Bytes::new(),
        }
    }
}

/// A request being built by [`TestClient`]
pub struct TestRequest<'a> {
    client: &'a TestClient,
    builder: http::request::Builder,
    body: Bytes,
}

impl TestRequest<'_> {
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Send a raw body with the given Content-Type
    pub fn body(self, body: impl Into<Bytes>, content_type: &str) -> Self {
        let mut req = self.header("content-type", content_type);
        req.body = body.into();
        req
    }

    /// Send `value` as an `application/json` body
    pub fn json<T: Serialize>(self, value: &T) -> Self {
        let body = match serde_json::to_vec(value) {
            Ok(body) => body,
            Err(e) => panic!("test request body is not serializable: {}", e),
        };
        self.body(body, "application/json")
    }

    /// Send `fields` as an `application/x-www-form-urlencoded` body
    pub fn form(self, fields: &[(&str, &str)]) -> Self {
        let body = match serde_urlencoded::to_string(fields) {
            Ok(body) => body,
            Err(e) => panic!("test form is not encodable: {}", e),
        };
        self.body(body, "application/x-www-form-urlencoded")
    }

    pub fn multipart(self, body: MultipartBody) -> Self {
        let content_type = body.content_type();
        self.body(body.to_bytes(), &content_type)
    }

    pub async fn send(self) -> HttpResponse {
        let request = match self.builder.body(self.body) {
            Ok(request) => request,
            Err(e) => panic!("invalid test request: {}", e),
        };
        dispatch(&self.client.router, &self.client.middleware, request).await
    }
}
