use crate::error::BindError;
use std::fmt;
use std::str::FromStr;

/// The part of the request a binder reads from
///
/// The source name doubles as the request-locals key the bound value is
/// stored under, so binders for different sources on one route never
/// collide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Source {
    /// Request body, decoded by Content-Type
    #[default]
    Body,
    /// Request body, usually a form; also receives uploaded files
    Form,
    /// Request body, usually JSON
    Json,
    /// Request body, usually XML
    Xml,
    /// URL query string
    Query,
    /// Matched route parameters
    Params,
}

impl Source {
    pub const ALL: [Source; 6] = [
        Source::Body,
        Source::Form,
        Source::Json,
        Source::Xml,
        Source::Query,
        Source::Params,
    ];

    /// The source name, also used as the locals key
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Body => "body",
            Source::Form => "form",
            Source::Json => "json",
            Source::Xml => "xml",
            Source::Query => "query",
            Source::Params => "params",
        }
    }

    /// Whether uploaded files are overlaid for this source
    pub fn accepts_files(&self) -> bool {
        matches!(self, Source::Body | Source::Form)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = BindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| BindError::UnrecognizedSource(s.to_string()))
    }
}
