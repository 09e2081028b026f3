//! `httpmock` helpers that wrap payloads in the API envelope.

use httpmock::prelude::*;
use httpmock::{Method, Mock, MockServer};
use serde::Serialize;
use serde_json::{Value, json};

/// Wrap `data` in a success envelope.
#[must_use]
pub fn envelope<T: Serialize>(data: &T) -> Value {
    json!({ "code": 0, "message": "success", "data": data })
}

/// Envelope carrying no data.
#[must_use]
pub fn empty_envelope() -> Value {
    json!({ "code": 0, "message": "success", "data": null })
}

/// Error envelope with the given message.
#[must_use]
pub fn error_envelope(code: i64, message: &str) -> Value {
    json!({ "code": code, "message": message, "data": null })
}

/// Register a `GET path` mock answering with `data` in an envelope.
pub fn mock_get<'a, T: Serialize>(server: &'a MockServer, path: &str, data: &T) -> Mock<'a> {
    let body = envelope(data);
    let path = path.to_string();
    server.mock(move |when, then| {
        when.method(GET).path(path.as_str());
        then.status(200)
            .header("content-type", "application/json")
            .json_body(body);
    })
}

/// Register a mock for `method path` answering with `status` and an error envelope.
pub fn mock_failure<'a>(
    server: &'a MockServer,
    method: Method,
    path: &str,
    status: u16,
    message: &str,
) -> Mock<'a> {
    let body = error_envelope(i64::from(status), message);
    let path = path.to_string();
    server.mock(move |when, then| {
        when.method(method).path(path.as_str());
        then.status(status)
            .header("content-type", "application/json")
            .json_body(body);
    })
}
