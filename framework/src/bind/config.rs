use super::{Source, Validator};
use crate::error::BindError;
use crate::http::Request;
use std::fmt;
use std::sync::Arc;

/// Predicate deciding whether a binder steps aside for a request
pub type SkipFn = Arc<dyn Fn(&Request) -> bool + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum SourceSetting {
    Known(Source),
    Named(String),
}

/// Binder configuration
///
/// # Example
///
/// ```rust,ignore
/// let config = BindConfig::new()
///     .source(Source::Form)
///     .form_file("avatar", "avatar_upload")
///     .next(|req| req.header("x-skip-bind").is_some());
/// ```
#[derive(Clone)]
pub struct BindConfig {
    next: Option<SkipFn>,
    validator: Validator,
    source: SourceSetting,
    form_file_fields: Vec<(String, String)>,
}

impl BindConfig {
    /// Defaults: no skip predicate, a default validator, `Source::Body`,
    /// no file fields
    pub fn new() -> Self {
        Self {
            next: None,
            validator: Validator::default(),
            source: SourceSetting::Known(Source::default()),
            form_file_fields: Vec::new(),
        }
    }

    /// Skip binding for requests where `f` returns true
    pub fn next<F>(mut self, f: F) -> Self
    where
        F: Fn(&Request) -> bool + Send + Sync + 'static,
    {
        self.next = Some(Arc::new(f));
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn source(mut self, source: Source) -> Self {
        self.source = SourceSetting::Known(source);
        self
    }

    /// Select the source by name, as read from configuration files or the
    /// environment
    ///
    /// An empty name keeps the default source. An unknown name is kept as
    /// given and every request through the binder fails with a 500.
    pub fn source_named(mut self, name: &str) -> Self {
        self.source = if name.is_empty() {
            SourceSetting::Known(Source::default())
        } else {
            match name.parse::<Source>() {
                Ok(source) => SourceSetting::Known(source),
                Err(_) => SourceSetting::Named(name.to_string()),
            }
        };
        self
    }

    /// Copy files uploaded under `form_field` into the struct field `field`
    pub fn form_file(mut self, field: impl Into<String>, form_field: impl Into<String>) -> Self {
        self.form_file_fields.push((field.into(), form_field.into()));
        self
    }

    /// Add several (struct field, form field) file mappings
    pub fn form_file_fields<I, F, K>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (F, K)>,
        F: Into<String>,
        K: Into<String>,
    {
        self.form_file_fields
            .extend(fields.into_iter().map(|(f, k)| (f.into(), k.into())));
        self
    }

    /// The configured source, or the error every request will get
    pub fn resolve_source(&self) -> Result<Source, BindError> {
        match &self.source {
            SourceSetting::Known(source) => Ok(*source),
            SourceSetting::Named(name) => Err(BindError::UnrecognizedSource(name.clone())),
        }
    }

    pub(crate) fn should_skip(&self, request: &Request) -> bool {
        self.next.as_ref().is_some_and(|skip| skip(request))
    }

    pub(crate) fn get_validator(&self) -> &Validator {
        &self.validator
    }

    pub(crate) fn get_form_file_fields(&self) -> &[(String, String)] {
        &self.form_file_fields
    }
}

impl Default for BindConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BindConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindConfig")
            .field("next", &self.next.as_ref().map(|_| "<fn>"))
            .field("validator", &self.validator)
            .field("source", &self.source)
            .field("form_file_fields", &self.form_file_fields)
            .finish()
    }
}
