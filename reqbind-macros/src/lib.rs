//! Procedural macros for reqbind
//!
//! - `#[derive(Schema)]` generates per-source field names and the file
//!   overlay for a request schema
//! - `#[schema]` adds every derive a schema needs in one attribute

use proc_macro::TokenStream;

mod schema;
mod utils;

/// Derive macro for `reqbind::Schema`
///
/// Field attributes:
/// - `#[bind(query = "..", params = "..", form = "..")]` renames the field in
///   key/value sources; `form` also covers `body`
/// - `#[serde(rename = "..")]` and the container `#[serde(rename_all = "..")]`
///   are honored for every source without a `bind` name
///
/// `Option<UploadedFile>` and `Vec<UploadedFile>` fields can receive
/// uploads; mark them `#[serde(skip_deserializing)]` (the `#[schema]`
/// attribute does this for you).
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Default, serde::Deserialize, validator::Validate, reqbind::Schema)]
/// #[serde(default)]
/// pub struct Search {
///     #[bind(query = "q")]
///     #[validate(length(min = 1))]
///     pub term: String,
/// }
/// ```
#[proc_macro_derive(Schema, attributes(bind))]
pub fn derive_schema(input: TokenStream) -> TokenStream {
    schema::derive_schema_impl(input)
}

/// Turn a plain struct into a request schema
///
/// Adds `Default`, `serde::Deserialize`, `validator::Validate` and
/// `reqbind::Schema` derives, makes missing fields fall back to their
/// defaults, and keeps uploaded-file fields out of deserialization.
///
/// # Example
///
/// ```rust,ignore
/// use reqbind::{schema, UploadedFile};
///
/// #[schema]
/// pub struct Upload {
///     #[bind(form = "title")]
///     #[validate(length(min = 1))]
///     pub title: String,
///
///     pub document: Option<UploadedFile>,
/// }
/// ```
#[proc_macro_attribute]
pub fn schema(attr: TokenStream, input: TokenStream) -> TokenStream {
    schema::schema_attr_impl(attr, input)
}
