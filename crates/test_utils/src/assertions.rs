//! Custom Test Assertions
//!
//! Assertion helpers for submissions and proxy responses that give more
//! useful failure messages than bare `assert_eq!`.

use domain_recall::ClaimSubmission;
use serde_json::Value;

/// Asserts the normalization invariants of a submission
///
/// # Panics
///
/// Panics if any string field has surrounding whitespace, the product
/// identifiers or state are not uppercase, or the state is not two characters.
pub fn assert_normalized(submission: &ClaimSubmission) {
    for (name, value) in [
        ("phone", &submission.phone),
        ("model_number", &submission.model_number),
        ("serial_number", &submission.serial_number),
        ("first_name", &submission.first_name),
        ("last_name", &submission.last_name),
        ("email", &submission.email),
        ("address.line1", &submission.address.line1),
        ("address.line2", &submission.address.line2),
        ("address.city", &submission.address.city),
        ("address.state", &submission.address.state),
        ("address.zip", &submission.address.zip),
    ] {
        assert_eq!(value.trim(), value.as_str(), "{} is not trimmed: {:?}", name, value);
    }

    for (name, value) in [
        ("model_number", &submission.model_number),
        ("serial_number", &submission.serial_number),
        ("address.state", &submission.address.state),
    ] {
        assert_eq!(&value.to_uppercase(), value, "{} is not uppercase: {:?}", name, value);
    }

    assert_eq!(
        submission.address.state.chars().count(),
        2,
        "state is not two characters: {:?}",
        submission.address.state
    );
}

/// Asserts that a proxy error body carries the expected message
///
/// # Panics
///
/// Panics if the body has no `error` string or it differs from `expected`.
pub fn assert_error_message(body: &Value, expected: &str) {
    let actual = body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("Expected an error body, got {}", body));

    assert_eq!(actual, expected, "Unexpected error message in {}", body);
}
