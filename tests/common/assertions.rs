//! Assertion helpers for tests.

use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine};
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert a JSON error response with the given status and `error` message
pub fn assert_error(response: &TestResponse, status: StatusCode, message: &str) {
    assert_status(response, status);
    let json: serde_json::Value = response.json();
    assert_eq!(
        json["error"].as_str(),
        Some(message),
        "Full response: {}",
        serde_json::to_string_pretty(&json).unwrap()
    );
}

/// Assert a successful comparison and return `(difference, totalPixels, percentDiff)`
pub fn assert_comparison(response: &TestResponse) -> (u64, u64, String) {
    assert_ok(response);
    let json: serde_json::Value = response.json();

    let difference = json["difference"].as_u64().expect("difference");
    let total = json["totalPixels"].as_u64().expect("totalPixels");
    let percent = json["percentDiff"].as_str().expect("percentDiff").to_string();
    assert!(json["diffImage"].is_string(), "Expected diffImage string");

    (difference, total, percent)
}

/// Assert the response carries an inline PNG and return its bytes
pub fn inline_diff_png(response: &TestResponse) -> Vec<u8> {
    let json: serde_json::Value = response.json();
    let uri = json["diffImage"].as_str().expect("diffImage");
    let encoded = uri
        .strip_prefix("data:image/png;base64,")
        .unwrap_or_else(|| panic!("Expected PNG data URI, got {uri:.40}"));
    let bytes = STANDARD.decode(encoded).expect("Invalid base64");
    assert_eq!(&bytes[0..8], b"\x89PNG\r\n\x1a\n");
    bytes
}

/// Assert permissive CORS headers are present
pub fn assert_cors(response: &TestResponse) {
    assert_eq!(
        response.header("access-control-allow-origin"),
        Some("*"),
        "Expected permissive CORS, headers: {:?}",
        response.headers
    );
}
