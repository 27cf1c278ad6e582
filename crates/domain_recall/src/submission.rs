//! Claim submission model
//!
//! `FormFields` is the raw, untrusted form state. `ClaimSubmission` is the
//! normalized payload that is posted to the proxy and relayed verbatim to
//! the workflow webhook.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::validation::{normalize, normalize_state, validate_form};

/// Tag identifying where a submission came from
pub const SUBMISSION_SOURCE: &str = "ryobi-recall-form";

/// Raw intake form state, one value per input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    pub phone: String,
    pub model: String,
    pub serial: String,

    pub first_name: String,
    pub last_name: String,
    pub email: String,

    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: String,

    pub consent: bool,
}

/// Normalized mailing address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub line1: String,
    /// Optional; sent as an empty string when left blank
    pub line2: String,
    pub city: String,
    /// Two-letter uppercase code
    pub state: String,
    pub zip: String,
}

/// A validated, normalized recall claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSubmission {
    pub phone: String,
    pub model_number: String,
    pub serial_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: PostalAddress,
    pub consent: bool,
    pub source: String,
    #[serde(with = "iso_millis")]
    pub submitted_at: DateTime<Utc>,
}

impl ClaimSubmission {
    /// Validates the form and builds the normalized payload
    ///
    /// # Arguments
    ///
    /// * `fields` - Raw form state
    /// * `submitted_at` - Submission timestamp
    ///
    /// # Errors
    ///
    /// Returns the first failing form rule.
    pub fn from_form(fields: &FormFields, submitted_at: DateTime<Utc>) -> Result<Self, FormError> {
        validate_form(fields)?;

        Ok(Self {
            phone: normalize(&fields.phone).to_string(),
            model_number: normalize(&fields.model).to_uppercase(),
            serial_number: normalize(&fields.serial).to_uppercase(),
            first_name: normalize(&fields.first_name).to_string(),
            last_name: normalize(&fields.last_name).to_string(),
            email: normalize(&fields.email).to_string(),
            address: PostalAddress {
                line1: normalize(&fields.address1).to_string(),
                line2: normalize(&fields.address2).to_string(),
                city: normalize(&fields.city).to_string(),
                state: normalize_state(&fields.state),
                zip: normalize(&fields.zip).to_string(),
            },
            consent: fields.consent,
            source: SUBMISSION_SOURCE.to_string(),
            submitted_at,
        })
    }
}

/// Successful proxy answer for a submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub submission_id: Option<String>,
}

/// Millisecond-precision UTC timestamps, e.g. `2024-05-01T12:00:00.000Z`
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
