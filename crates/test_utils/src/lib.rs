//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! recall intake test suite.
//!
//! # Modules
//!
//! - `fixtures`: Fixed form states and proxy payloads
//! - `builders`: Form builders filled with generated customer data
//! - `generators`: Property-based test data generators
//! - `assertions`: Assertion helpers for submissions and error bodies
//! - `webhook`: Stub workflow webhook server

pub mod fixtures;
pub mod builders;
pub mod generators;
pub mod assertions;
pub mod webhook;

pub use fixtures::*;
pub use builders::*;
pub use generators::*;
pub use assertions::*;
pub use webhook::*;
