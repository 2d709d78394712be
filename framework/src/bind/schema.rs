//! Schema descriptions
//!
//! A schema is a plain struct that deserializes with serde, validates with
//! `validator`, and knows what each of its fields is called in every data
//! source. `#[derive(Schema)]` (or the `#[schema]` attribute) generates the
//! naming and file-overlay half from the struct definition.
//!
//! # Example
//!
//! ```rust,ignore
//! use reqbind::{schema, UploadedFile};
//!
//! #[schema]
//! #[derive(Debug, serde::Serialize)]
//! pub struct Upload {
//!     #[bind(form = "title", query = "t")]
//!     #[validate(length(min = 1))]
//!     pub title: String,
//!
//!     pub document: Option<UploadedFile>,
//!     pub attachments: Vec<UploadedFile>,
//! }
//! ```

use super::Source;
use crate::error::BindError;
use crate::http::UploadedFile;
use serde::de::DeserializeOwned;
use validator::Validate;

/// A bindable, validatable request schema
///
/// Field names in JSON and XML bodies are the serde names. Key/value sources
/// (`query`, `params`, and `form`/`body` when the body is urlencoded or
/// multipart) can rename fields with `#[bind(query = "..", params = "..",
/// form = "..")]`; unnamed fields use the serde name there too.
pub trait Schema: DeserializeOwned + Validate + Send + Sync + 'static {
    /// Name of a field as `source` spells it
    ///
    /// `field` may be the Rust identifier or the serde name. Returns `None`
    /// for names the schema does not declare.
    fn field_name(field: &str, source: Source) -> Option<&'static str>;

    /// Serde name of the field that `source` sends as `key`
    ///
    /// Returns `None` when the key needs no renaming.
    fn source_key(key: &str, source: Source) -> Option<&'static str>;

    /// Assign uploaded files into the struct field named `field`
    ///
    /// Single-file fields (`Option<UploadedFile>`) take the first file,
    /// sequence fields (`Vec<UploadedFile>`) take all of them in order. Any
    /// other field, or a name the schema does not have, is rejected.
    fn assign_files(&mut self, field: &str, files: Vec<UploadedFile>) -> Result<(), BindError> {
        let _ = files;
        Err(BindError::unsupported_file_field(field, "missing"))
    }
}

/// A struct field that can receive uploaded files
pub trait FileSlot {
    fn fill(&mut self, files: Vec<UploadedFile>);
}

impl FileSlot for Option<UploadedFile> {
    fn fill(&mut self, files: Vec<UploadedFile>) {
        if let Some(first) = files.into_iter().next() {
            *self = Some(first);
        }
    }
}

impl FileSlot for Vec<UploadedFile> {
    fn fill(&mut self, files: Vec<UploadedFile>) {
        *self = files;
    }
}
