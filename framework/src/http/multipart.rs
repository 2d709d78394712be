//! Multipart form parsing
//!
//! The request body is already buffered, so a multipart form can be parsed
//! as many times as needed: once for the text fields while binding, and
//! again for the uploaded files during the file overlay.

use bytes::Bytes;
use serde::Serialize;
use std::collections::HashMap;
use std::convert::Infallible;

/// A file uploaded through a multipart form
///
/// Serializes as metadata only; the contents stay in memory in `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFile {
    /// Form field the file was uploaded under
    pub field_name: String,
    /// File name sent by the client
    pub file_name: String,
    /// Content-Type of the part, if the client sent one
    pub content_type: Option<String>,
    /// Size in bytes
    pub size: usize,
    #[serde(skip)]
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(
        field_name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: Option<String>,
        data: Bytes,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            file_name: file_name.into(),
            content_type,
            size: data.len(),
            data,
        }
    }
}

/// A parsed `multipart/form-data` body
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    values: Vec<(String, String)>,
    files: HashMap<String, Vec<UploadedFile>>,
}

impl MultipartForm {
    /// Parse a buffered multipart body
    ///
    /// Parts with a filename are collected as files (in upload order per
    /// field); all other parts are text values.
    pub async fn parse(content_type: &str, body: Bytes) -> Result<Self, multer::Error> {
        let boundary = multer::parse_boundary(content_type)?;
        let stream = futures_util::stream::once(async move { Ok::<Bytes, Infallible>(body) });
        let mut multipart = multer::Multipart::new(stream, boundary);

        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(|m| m.to_string());
                    let data = field.bytes().await?;
                    form.files
                        .entry(name.clone())
                        .or_default()
                        .push(UploadedFile::new(name, file_name, content_type, data));
                }
                None => {
                    let value = field.text().await?;
                    form.values.push((name, value));
                }
            }
        }

        Ok(form)
    }

    /// Text fields in the order they were sent
    pub fn values(&self) -> &[(String, String)] {
        &self.values
    }

    /// Files uploaded under a form field
    pub fn files(&self, field: &str) -> Option<&[UploadedFile]> {
        self.files.get(field).map(Vec::as_slice)
    }
}
