//! Recall Claim Domain
//!
//! This crate holds everything about a recall claim that does not depend on
//! HTTP: the submission model, the validation rules shared by the form and
//! the proxy, and the intake form itself.
//!
//! # Submission Flow
//!
//! ```text
//! FormFields -> validate_form -> ClaimSubmission -> SubmissionTransport -> proxy
//! ```
//!
//! # Example
//!
//! ```rust
//! use domain_recall::{IntakeForm, Prefill};
//!
//! let prefill = Prefill::from_query_pairs([("phone", "+15551234567"), ("model", "ry1")]);
//! let mut form = IntakeForm::with_prefill(prefill);
//! form.fields_mut().serial = "ab1".to_string();
//!
//! assert_eq!(form.fields().model, "ry1");
//! ```

pub mod error;
pub mod form;
pub mod submission;
pub mod validation;

pub use error::{FormError, RelayError, TransportError};
pub use form::{IntakeForm, Prefill, SubmissionStatus, SubmissionTransport};
pub use submission::{ClaimSubmission, FormFields, PostalAddress, SubmissionReceipt, SUBMISSION_SOURCE};
pub use validation::{is_email, is_phone, normalize_state, validate_form, RelayFields};
