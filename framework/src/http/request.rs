use super::multipart::MultipartForm;
use crate::bind::Source;
use crate::error::BindError;
use bytes::Bytes;
use std::any::Any;
use std::collections::HashMap;

/// HTTP Request wrapper with a buffered body, route parameters and
/// request-scoped locals
///
/// The body is collected before the request reaches any middleware, so it
/// can be read more than once.
pub struct Request {
    inner: http::Request<Bytes>,
    params: HashMap<String, String>,
    locals: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl Request {
    pub fn new(inner: http::Request<Bytes>) -> Self {
        Self {
            inner,
            params: HashMap::new(),
            locals: HashMap::new(),
        }
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    /// Get the request method
    pub fn method(&self) -> &http::Method {
        self.inner.method()
    }

    /// Get the request path
    pub fn path(&self) -> &str {
        self.inner.uri().path()
    }

    /// Get the raw query string, without the leading `?`
    pub fn query(&self) -> Option<&str> {
        self.inner.uri().query()
    }

    /// Get a route parameter by name (e.g., /users/{id})
    /// Returns Err(BindError::Param) if the parameter is missing, enabling use of `?` operator
    pub fn param(&self, name: &str) -> Result<&str, BindError> {
        self.params
            .get(name)
            .map(|s| s.as_str())
            .ok_or_else(|| BindError::Param(name.to_string()))
    }

    /// Get all route parameters
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Get the inner http request
    pub fn inner(&self) -> &http::Request<Bytes> {
        &self.inner
    }

    /// Get a header value by name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name).and_then(|v| v.to_str().ok())
    }

    /// Get the Content-Type header
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Get the buffered body
    pub fn body(&self) -> &Bytes {
        self.inner.body()
    }

    /// Parse the buffered body as `multipart/form-data`
    pub async fn multipart_form(&self) -> Result<MultipartForm, multer::Error> {
        MultipartForm::parse(self.content_type().unwrap_or_default(), self.body().clone()).await
    }

    /// Store a value in request-scoped storage, replacing any value under `key`
    pub fn set_local<V: Any + Send + Sync>(&mut self, key: impl Into<String>, value: V) {
        self.locals.insert(key.into(), Box::new(value));
    }

    /// Borrow a value from request-scoped storage
    ///
    /// Returns `None` when nothing is stored under `key` or the stored value
    /// is not a `V`.
    pub fn local<V: Any>(&self, key: &str) -> Option<&V> {
        self.locals.get(key).and_then(|v| v.downcast_ref::<V>())
    }

    /// Remove a value from request-scoped storage
    ///
    /// A value of another type is left in place.
    pub fn take_local<V: Any>(&mut self, key: &str) -> Option<V> {
        if self.local::<V>(key).is_none() {
            return None;
        }
        self.locals
            .remove(key)
            .and_then(|v| v.downcast::<V>().ok())
            .map(|v| *v)
    }

    /// Check whether anything is stored under `key`
    pub fn has_local(&self, key: &str) -> bool {
        self.locals.contains_key(key)
    }

    /// Borrow the value a binder stored for `source`
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// pub async fn store(req: Request) -> Response {
    ///     let person = req.bound::<Person>(Source::Json)?;
    ///     json(serde_json::json!({ "name": person.name }))
    /// }
    /// ```
    pub fn bound<T: Any>(&self, source: Source) -> Result<&T, BindError> {
        self.local::<T>(source.as_str()).ok_or_else(|| {
            BindError::internal(format!("No bound value for source '{}'", source))
        })
    }
}
