//! Shared validation rules
//!
//! The intake form and the submission proxy both call into this module, so
//! the phone, model and serial checks cannot drift between the two layers.
//!
//! # Form Rules
//!
//! Checked in order, the first failure wins:
//!
//! 1. Phone, model and serial are present
//! 2. Phone matches the loose E.164 pattern
//! 3. First and last name are present
//! 4. Email is present and looks like `local@domain.tld`
//! 5. Address line 1, city, state and zip are present
//! 6. State is exactly two characters
//! 7. Consent was given
//!
//! # Relay Rules
//!
//! The proxy cannot trust the client, so it re-checks rules 1 and 2 on the
//! raw JSON body before forwarding it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::{FormError, RelayError};
use crate::submission::FormFields;

// ASCII digits only; `\d` in the regex crate also matches other scripts.
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9][0-9]{7,14}$").expect("phone pattern compiles"));

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Trims surrounding whitespace from a raw field value
pub fn normalize(value: &str) -> &str {
    value.trim()
}

/// Normalizes a state code the way it is sent: trimmed and uppercased
///
/// Uppercasing can lengthen a value (`ß` becomes `SS`), so length rules
/// must run on this result.
pub fn normalize_state(value: &str) -> String {
    normalize(value).to_uppercase()
}

/// Loose E.164 check: optional `+`, first digit 1-9, 8 to 15 digits in total
///
/// The value is expected to be trimmed already.
pub fn is_phone(value: &str) -> bool {
    PHONE_PATTERN.is_match(value)
}

/// Basic `local@domain.tld` shape check
pub fn is_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Checks the three product identifiers common to the form and the proxy
///
/// The form maps the returned error onto its own, more detailed messages.
pub fn check_product_details(phone: &str, model: &str, serial: &str) -> Result<(), RelayError> {
    let (phone, model, serial) = (normalize(phone), normalize(model), normalize(serial));

    if phone.is_empty() || model.is_empty() || serial.is_empty() {
        return Err(RelayError::MissingFields);
    }
    if !is_phone(phone) {
        return Err(RelayError::InvalidPhone);
    }
    Ok(())
}

/// Validates raw intake form fields, reporting the first failing rule
pub fn validate_form(fields: &FormFields) -> Result<(), FormError> {
    check_product_details(&fields.phone, &fields.model, &fields.serial).map_err(|e| match e {
        RelayError::MissingFields => FormError::MissingProductDetails,
        RelayError::InvalidPhone => FormError::InvalidPhone,
    })?;

    if normalize(&fields.first_name).is_empty() || normalize(&fields.last_name).is_empty() {
        return Err(FormError::MissingName);
    }

    let email = normalize(&fields.email);
    if email.is_empty() || !is_email(email) {
        return Err(FormError::InvalidEmail);
    }

    let state = normalize_state(&fields.state);
    if [&fields.address1, &fields.city, &fields.zip]
        .iter()
        .any(|f| normalize(f).is_empty())
        || state.is_empty()
    {
        return Err(FormError::IncompleteAddress);
    }

    if state.chars().count() != 2 {
        return Err(FormError::InvalidState);
    }

    if !fields.consent {
        return Err(FormError::MissingConsent);
    }

    Ok(())
}

/// The three identifiers the proxy re-checks before relaying a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayFields {
    pub phone: String,
    pub model_number: String,
    pub serial_number: String,
}

impl RelayFields {
    /// Extracts and checks the relay fields from a raw JSON body
    ///
    /// `model_number` falls back to `model` and `serial_number` falls back to
    /// `serial` when the primary key is absent or null.
    pub fn extract(body: &Value) -> Result<Self, RelayError> {
        let phone = field_text(body, &["phone"]);
        let model_number = field_text(body, &["model_number", "model"]);
        let serial_number = field_text(body, &["serial_number", "serial"]);

        check_product_details(&phone, &model_number, &serial_number)?;

        Ok(Self {
            phone: normalize(&phone).to_string(),
            model_number: normalize(&model_number).to_string(),
            serial_number: normalize(&serial_number).to_string(),
        })
    }
}

/// Reads the first non-null key as text
///
/// Numbers and booleans are stringified; objects and arrays read as empty.
fn field_text(body: &Value, keys: &[&str]) -> String {
    let value = keys
        .iter()
        .filter_map(|key| body.get(*key))
        .find(|v| !v.is_null());

    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}
