//! Recall domain errors
//!
//! Each error's `Display` text is the exact message shown to the customer
//! or returned by the proxy, so the variants double as the message catalog.

use thiserror::Error;

/// A failed intake form rule
///
/// Rules are checked in declaration order and only the first failure is
/// reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Phone, model, and serial are required.")]
    MissingProductDetails,

    #[error("Phone number format looks invalid. Use +15551234567 format.")]
    InvalidPhone,

    #[error("First and last name are required.")]
    MissingName,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Please complete your address (line 1, city, state, zip).")]
    IncompleteAddress,

    #[error("State must be a 2-letter code (example: TX).")]
    InvalidState,

    #[error("Consent is required to submit.")]
    MissingConsent,
}

/// A failed server-side check on a relayed payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("Missing phone, model number, or serial number.")]
    MissingFields,

    #[error("Phone number format looks invalid.")]
    InvalidPhone,
}

/// Failure delivering a submission from the form to the proxy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The proxy answered with an error body
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The proxy could not be reached or answered with something unreadable
    #[error("Network error: {0}")]
    Network(String),
}

impl TransportError {
    /// Creates a Rejected error
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        TransportError::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        TransportError::Network(message.into())
    }
}
