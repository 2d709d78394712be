//! Request binding middleware
//!
//! [`Bind`] decodes one part of the request (body, query string or route
//! parameters) into a [`Schema`] struct, overlays uploaded files, validates
//! the result and stores it in the request locals under the source name.
//! Handlers further down the chain read it back with
//! [`Request::bound`](crate::Request::bound).
//!
//! # Example
//!
//! ```rust,ignore
//! use reqbind::{json, schema, Bind, BindConfig, Request, Response, Router, Source};
//!
//! #[schema]
//! pub struct Person {
//!     #[validate(length(min = 1))]
//!     pub name: String,
//!     #[validate(range(min = 0))]
//!     pub age: i32,
//! }
//!
//! async fn store(req: Request) -> Response {
//!     let person = req.bound::<Person>(Source::Json)?;
//!     json(serde_json::json!({ "name": person.name }))
//! }
//!
//! let router = Router::new()
//!     .post("/people", store)
//!     .middleware(Bind::<Person>::new(BindConfig::new().source(Source::Json)));
//! ```

mod config;
mod schema;
mod source;
mod validator;

pub use config::{BindConfig, SkipFn};
pub use schema::{FileSlot, Schema};
pub use source::Source;
pub use validator::Validator;

use crate::error::BindError;
use crate::http::{form_pairs, parse_json, parse_pairs, parse_xml, BodyKind, Request, Response};
use crate::middleware::{Middleware, Next};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;

/// Binding middleware for schema `T`
pub struct Bind<T: Schema> {
    config: Arc<BindConfig>,
    _schema: PhantomData<fn() -> T>,
}

impl<T: Schema> Bind<T> {
    pub fn new(config: BindConfig) -> Self {
        if let Err(err) = config.resolve_source() {
            tracing::warn!(
                schema = std::any::type_name::<T>(),
                error = %err,
                "binder configured with an unknown source; every request will fail"
            );
        }
        Self {
            config: Arc::new(config),
            _schema: PhantomData,
        }
    }

    pub fn config(&self) -> &BindConfig {
        &self.config
    }

    /// Decode, overlay files into and validate a `T` from `request`
    ///
    /// Does not consult the skip predicate or touch the request locals.
    pub async fn bind(&self, request: &Request) -> Result<T, BindError> {
        self.bind_sourced(request).await.map(|(_, data)| data)
    }

    async fn bind_sourced(&self, request: &Request) -> Result<(Source, T), BindError> {
        let source = self.config.resolve_source()?;
        let mut data: T = decode(request, source).await?;

        let file_fields = self.config.get_form_file_fields();
        if source.accepts_files() && !file_fields.is_empty() {
            let form = request
                .multipart_form()
                .await
                .map_err(|e| BindError::Multipart(e.to_string()))?;
            for (field, form_field) in file_fields {
                if let Some(files) = form.files(form_field) {
                    data.assign_files(field, files.to_vec())?;
                }
            }
        }

        self.config
            .get_validator()
            .validate(&data, source)
            .map_err(BindError::Validation)?;

        Ok((source, data))
    }
}

impl<T: Schema> Clone for Bind<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            _schema: PhantomData,
        }
    }
}

#[async_trait]
impl<T: Schema> Middleware for Bind<T> {
    async fn handle(&self, mut request: Request, next: Next) -> Response {
        if self.config.should_skip(&request) {
            return next(request).await;
        }

        match self.bind_sourced(&request).await {
            Ok((source, data)) => {
                tracing::debug!(
                    path = %request.path(),
                    %source,
                    schema = std::any::type_name::<T>(),
                    "request bound"
                );
                request.set_local(source.as_str(), data);
                next(request).await
            }
            Err(err) => {
                let path = request.path();
                match &err {
                    BindError::Validation(errors) => {
                        tracing::warn!(%path, fields = ?errors.fields(), "validation failed")
                    }
                    e if e.is_configuration() || matches!(e, BindError::Multipart(_)) => {
                        tracing::error!(%path, error = %e, "binding failed")
                    }
                    e => tracing::warn!(%path, error = %e, "request rejected"),
                }
                Err(err.into())
            }
        }
    }
}

/// Decode the raw payload for `source` into a fresh `T`
async fn decode<T: Schema>(request: &Request, source: Source) -> Result<T, BindError> {
    match source {
        Source::Body | Source::Form | Source::Json | Source::Xml => {
            match BodyKind::from_content_type(request.content_type())? {
                BodyKind::Json => parse_json(request.body()),
                BodyKind::Xml => parse_xml(request.body()),
                BodyKind::UrlEncoded => {
                    let pairs = form_pairs(request.body())?;
                    parse_pairs(&rename_keys::<T>(pairs, source))
                }
                BodyKind::Multipart => {
                    let form = request.multipart_form().await.map_err(BindError::parse)?;
                    parse_pairs(&rename_keys::<T>(form.values().to_vec(), source))
                }
            }
        }
        Source::Query => {
            let pairs = form_pairs(request.query().unwrap_or_default().as_bytes())?;
            parse_pairs(&rename_keys::<T>(pairs, source))
        }
        Source::Params => {
            let pairs = request
                .params()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            parse_pairs(&rename_keys::<T>(pairs, source))
        }
    }
}

/// Map keys as `source` sends them to the schema's serde names
fn rename_keys<T: Schema>(pairs: Vec<(String, String)>, source: Source) -> Vec<(String, String)> {
    pairs
        .into_iter()
        .map(|(key, value)| match T::source_key(&key, source) {
            Some(name) => (name.to_string(), value),
            None => (key, value),
        })
        .collect()
}
