//! Testing utilities
//!
//! - [`TestClient`] to drive a router in-process
//! - [`MultipartBody`] to build `multipart/form-data` payloads
//! - `expect!` for fluent assertions with clear expected/received output
//!
//! # Example
//!
//! ```rust,ignore
//! use reqbind::expect;
//! use reqbind::testing::TestClient;
//!
//! #[tokio::test]
//! async fn rejects_minors() {
//!     let client = TestClient::new(routes());
//!     let response = client
//!         .post("/people")
//!         .json(&serde_json::json!({ "name": "John", "age": 12 }))
//!         .send()
//!         .await;
//!
//!     expect!(&response).to_have_status(422);
//!     expect!(&response).to_have_json(serde_json::json!({ "age": "range" }));
//! }
//! ```

mod client;
mod expect;
mod multipart;

pub use client::{TestClient, TestRequest};
pub use expect::Expect;
pub use multipart::MultipartBody;

/// Start a fluent assertion on a value
#[macro_export]
macro_rules! expect {
    ($value:expr) => {
        $crate::testing::Expect::new($value, concat!(file!(), ":", line!()))
    };
}
