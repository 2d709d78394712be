//! Fluent assertions with expected/received output
//!
//! Matchers panic with the assertion site (captured by [`expect!`]) and a
//! side-by-side of what was expected and what arrived.
//!
//! [`expect!`]: crate::expect

use crate::http::HttpResponse;
use serde_json::Value;
use std::fmt::Debug;

fn fail(location: &str, call: &str, expected: impl Debug, received: impl Debug) -> ! {
    panic!(
        "\nassertion failed at {}\n  {}\n\n  Expected: {:?}\n  Received: {:?}\n",
        location, call, expected, received
    )
}

/// Wrapper returned by `expect!`
pub struct Expect<T> {
    value: T,
    location: &'static str,
}

impl<T> Expect<T> {
    pub fn new(value: T, location: &'static str) -> Self {
        Self { value, location }
    }
}

impl<T: Debug + PartialEq> Expect<T> {
    /// Assert that the value equals `expected`
    pub fn to_equal(&self, expected: T) {
        if self.value != expected {
            fail(self.location, "expect!(actual).to_equal(expected)", expected, &self.value);
        }
    }
}

impl Expect<bool> {
    pub fn to_be_true(&self) {
        if !self.value {
            fail(self.location, "expect!(value).to_be_true()", true, false);
        }
    }

    pub fn to_be_false(&self) {
        if self.value {
            fail(self.location, "expect!(value).to_be_false()", false, true);
        }
    }
}

impl<T: Debug> Expect<Option<T>> {
    pub fn to_be_some(&self) {
        if self.value.is_none() {
            fail(self.location, "expect!(option).to_be_some()", "Some(_)", "None");
        }
    }

    pub fn to_be_none(&self) {
        if let Some(v) = &self.value {
            fail(self.location, "expect!(option).to_be_none()", "None", v);
        }
    }
}

/// Response matchers
///
/// # Example
///
/// ```rust,ignore
/// let response = client.post("/people").json(&body).send().await;
/// expect!(&response).to_have_status(422);
/// expect!(&response).to_have_json(serde_json::json!({ "age": "range" }));
/// ```
impl Expect<&HttpResponse> {
    pub fn to_have_status(&self, expected: u16) {
        let actual = self.value.status_code();
        if actual != expected {
            panic!(
                "\nassertion failed at {}\n  expect!(response).to_have_status({})\n\n  Expected: {}\n  Received: {}\n  Body: {}\n",
                self.location,
                expected,
                expected,
                actual,
                self.value.body()
            );
        }
    }

    /// Assert a 2xx status
    pub fn to_be_successful(&self) {
        let actual = self.value.status_code();
        if !(200..300).contains(&actual) {
            fail(
                self.location,
                "expect!(response).to_be_successful()",
                "2xx",
                format!("{} {}", actual, self.value.body()),
            );
        }
    }

    /// Assert that the body parses as JSON equal to `expected`
    pub fn to_have_json(&self, expected: Value) {
        match serde_json::from_str::<Value>(self.value.body()) {
            Ok(actual) if actual == expected => {}
            Ok(actual) => fail(self.location, "expect!(response).to_have_json(expected)", expected, actual),
            Err(_) => fail(
                self.location,
                "expect!(response).to_have_json(expected)",
                expected,
                self.value.body(),
            ),
        }
    }

    pub fn to_have_body_containing(&self, needle: &str) {
        if !self.value.body().contains(needle) {
            fail(
                self.location,
                "expect!(response).to_have_body_containing(needle)",
                needle,
                self.value.body(),
            );
        }
    }
}
