//! Pre-built Test Fixtures
//!
//! Ready-to-use form states and proxy payloads. Values are fixed so tests
//! can assert on them directly.

use chrono::{DateTime, TimeZone, Utc};
use domain_recall::FormFields;
use serde_json::{json, Value};

/// Fixture for raw intake form state
pub struct FormFixtures;

impl FormFixtures {
    /// A fully valid, already-normalized form
    pub fn valid() -> FormFields {
        FormFields {
            phone: "+15551234567".to_string(),
            model: "RY40630VNM".to_string(),
            serial: "AB123456789".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane.doe@example.com".to_string(),
            address1: "100 Main St".to_string(),
            address2: String::new(),
            city: "Austin".to_string(),
            state: "TX".to_string(),
            zip: "78701".to_string(),
            consent: true,
        }
    }

    /// A valid form typed carelessly: padded, lowercase identifiers
    pub fn untidy() -> FormFields {
        FormFields {
            phone: "  +15551234567 ".to_string(),
            model: " ry40630vnm".to_string(),
            serial: "ab123456789  ".to_string(),
            first_name: " Jane".to_string(),
            last_name: "Doe ".to_string(),
            email: " jane.doe@example.com ".to_string(),
            address1: " 100 Main St ".to_string(),
            address2: " Apt 4 ".to_string(),
            city: " Austin ".to_string(),
            state: " tx ".to_string(),
            zip: " 78701 ".to_string(),
            consent: true,
        }
    }
}

/// Fixture for JSON bodies posted to the proxy
pub struct PayloadFixtures;

impl PayloadFixtures {
    /// The smallest body the proxy accepts
    pub fn minimal() -> Value {
        json!({
            "phone": "+15551234567",
            "model_number": "RY1",
            "serial_number": "AB1"
        })
    }

    /// Minimal body using the short `model`/`serial` keys
    pub fn aliased() -> Value {
        json!({
            "phone": "+15551234567",
            "model": "RY1",
            "serial": "AB1"
        })
    }

    /// Body with a phone that fails the loose E.164 check
    pub fn invalid_phone() -> Value {
        json!({
            "phone": "notaphone",
            "model_number": "X",
            "serial_number": "Y"
        })
    }

    /// Body missing the serial number
    pub fn missing_serial() -> Value {
        json!({
            "phone": "+15551234567",
            "model_number": "RY1"
        })
    }
}

/// Fixture for timestamps
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// A fixed submission time
    pub fn submitted_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}
