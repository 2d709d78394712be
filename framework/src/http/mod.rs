mod body;
mod multipart;
mod request;
mod response;

pub use body::{
    collect_body, form_pairs, parse_json, parse_pairs, parse_xml, BodyKind,
};
pub use multipart::{MultipartForm, UploadedFile};
pub use request::Request;
pub use response::{HttpResponse, Response};

/// Create a text response
pub fn text(body: impl Into<String>) -> Response {
    Ok(HttpResponse::text(body))
}

/// Create a JSON response from a serde_json::Value
pub fn json(body: serde_json::Value) -> Response {
    Ok(HttpResponse::json(body))
}
