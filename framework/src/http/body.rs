//! Body parsing utilities for HTTP requests
//!
//! Provides body collection and decoders for JSON, XML, form-urlencoded and
//! key/value data. Decoder failures become [`BindError::Parse`] carrying the
//! decoder's own message.

use crate::error::BindError;
use bytes::Bytes;
use http_body_util::{BodyExt, Limited};
use hyper::body::Incoming;
use serde::de::DeserializeOwned;

/// Collect the full body from an Incoming stream, refusing bodies over `limit` bytes
pub async fn collect_body(body: Incoming, limit: usize) -> Result<Bytes, BindError> {
    Limited::new(body, limit)
        .collect()
        .await
        .map(|collected| collected.to_bytes())
        .map_err(|e| {
            if e.is::<http_body_util::LengthLimitError>() {
                BindError::PayloadTooLarge { limit }
            } else {
                BindError::internal(format!("Failed to read request body: {}", e))
            }
        })
}

/// Parse bytes as JSON into the target type
pub fn parse_json<T: DeserializeOwned>(bytes: &Bytes) -> Result<T, BindError> {
    serde_json::from_slice(bytes).map_err(BindError::parse)
}

/// Parse bytes as XML into the target type
pub fn parse_xml<T: DeserializeOwned>(bytes: &Bytes) -> Result<T, BindError> {
    let text = std::str::from_utf8(bytes).map_err(BindError::parse)?;
    quick_xml::de::from_str(text).map_err(BindError::parse)
}

/// Split a form-urlencoded string into decoded key/value pairs
pub fn form_pairs(input: &[u8]) -> Result<Vec<(String, String)>, BindError> {
    serde_urlencoded::from_bytes(input).map_err(BindError::parse)
}

/// Decode key/value pairs into the target type
///
/// Values are strings on the wire; numbers and booleans are parsed out of
/// them. A key repeated in `pairs` fills a sequence field in order, and a
/// single occurrence fills it with one element. Pairs with an empty value
/// are dropped, so `limit=` leaves `limit` at its default.
pub fn parse_pairs<T: DeserializeOwned>(pairs: &[(String, String)]) -> Result<T, BindError> {
    let present: Vec<&(String, String)> = pairs.iter().filter(|(_, v)| !v.is_empty()).collect();
    let encoded = serde_urlencoded::to_string(present).map_err(BindError::parse)?;
    serde_html_form::from_str(&encoded).map_err(BindError::parse)
}

/// Body encodings the binder knows how to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Xml,
    UrlEncoded,
    Multipart,
}

impl BodyKind {
    /// Pick the decoder for a Content-Type header
    ///
    /// A missing Content-Type decodes as JSON.
    pub fn from_content_type(content_type: Option<&str>) -> Result<Self, BindError> {
        let Some(raw) = content_type else {
            return Ok(Self::Json);
        };
        let mime = raw
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "application/json" => Ok(Self::Json),
            m if m.starts_with("application/") && m.ends_with("+json") => Ok(Self::Json),
            "application/xml" | "text/xml" => Ok(Self::Xml),
            "application/x-www-form-urlencoded" => Ok(Self::UrlEncoded),
            "multipart/form-data" => Ok(Self::Multipart),
            _ => Err(BindError::Parse(format!("Unsupported Content-Type: {}", raw))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Page {
        page: i32,
        limit: i32,
    }

    #[test]
    fn picks_decoder_from_content_type() {
        assert_eq!(BodyKind::from_content_type(None).unwrap(), BodyKind::Json);
        assert_eq!(
            BodyKind::from_content_type(Some("application/json; charset=utf-8")).unwrap(),
            BodyKind::Json
        );
        assert_eq!(
            BodyKind::from_content_type(Some("application/problem+json")).unwrap(),
            BodyKind::Json
        );
        assert_eq!(
            BodyKind::from_content_type(Some("text/xml")).unwrap(),
            BodyKind::Xml
        );
        assert_eq!(
            BodyKind::from_content_type(Some("multipart/form-data; boundary=x")).unwrap(),
            BodyKind::Multipart
        );
        assert!(BodyKind::from_content_type(Some("text/plain")).is_err());
    }

    #[test]
    fn pairs_decode_numbers_from_strings() {
        let pairs = vec![
            ("page".to_string(), "2".to_string()),
            ("limit".to_string(), "50".to_string()),
        ];
        let page: Page = parse_pairs(&pairs).unwrap();
        assert_eq!(page, Page { page: 2, limit: 50 });
    }

    #[test]
    fn repeated_keys_fill_sequences() {
        #[derive(Debug, Default, Deserialize)]
        #[serde(default)]
        struct Filter {
            tags: Vec<String>,
            ids: Vec<u32>,
        }

        let pairs = vec![
            ("tags".to_string(), "a".to_string()),
            ("ids".to_string(), "7".to_string()),
            ("tags".to_string(), "b".to_string()),
        ];
        let filter: Filter = parse_pairs(&pairs).unwrap();
        assert_eq!(filter.tags, vec!["a", "b"]);
        assert_eq!(filter.ids, vec![7]);
    }

    #[test]
    fn empty_values_keep_defaults() {
        let pairs = vec![
            ("page".to_string(), "4".to_string()),
            ("limit".to_string(), String::new()),
        ];
        let page: Page = parse_pairs(&pairs).unwrap();
        assert_eq!(page, Page { page: 4, limit: 0 });
    }

    #[test]
    fn pairs_reject_type_mismatch() {
        let pairs = vec![("page".to_string(), "two".to_string())];
        let err = parse_pairs::<Page>(&pairs).unwrap_err();
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn xml_body_decodes_child_elements() {
        let body = Bytes::from_static(b"<page><page>3</page><limit>10</limit></page>");
        let page: Page = parse_xml(&body).unwrap();
        assert_eq!(page, Page { page: 3, limit: 10 });
    }

    #[test]
    fn malformed_json_keeps_decoder_message() {
        let err = parse_json::<Page>(&Bytes::from_static(b"{\"page\":")).unwrap_err();
        assert!(matches!(err, BindError::Parse(ref msg) if msg.contains("EOF")));
    }
}
