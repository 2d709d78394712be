//! reqbind: request binding and validation middleware on a small hyper host
//!
//! A [`Bind`] middleware decodes the request body, query string or route
//! parameters into a [`Schema`] struct, overlays uploaded files, validates
//! it and hands it to the route handler through the request locals.

extern crate self as reqbind;

pub mod bind;
pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routing;
pub mod server;
pub mod testing;

pub use bind::{Bind, BindConfig, FileSlot, Schema, SkipFn, Source, Validator};
pub use error::{BindError, FieldErrors};
pub use crate::http::{json, text, HttpResponse, MultipartForm, Request, Response, UploadedFile};
pub use middleware::{Middleware, MiddlewareRegistry, Next};
pub use routing::{RouteBuilder, Router};
pub use server::Server;

// The derive shares its name with the trait; they live in separate namespaces
pub use reqbind_macros::{schema, Schema};

pub use async_trait::async_trait;
