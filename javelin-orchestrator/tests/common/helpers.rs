//! Assertions shared by the javelin-orchestrator integration tests

use axum::http::StatusCode;
use axum_test::TestResponse;

/// Assert HTTP response is successful
pub fn assert_success(response: &TestResponse) {
    assert!(
        response.status_code().is_success(),
        "Expected success, got: {} ({})",
        response.status_code(),
        response.text()
    );
}

/// Assert HTTP response has specific status code and error code
pub fn assert_error(response: &TestResponse, expected: StatusCode, code: &str) {
    assert_eq!(
        response.status_code(),
        expected,
        "Expected status {}, got {}",
        expected,
        response.status_code()
    );
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], code, "unexpected error body: {}", body);
}
