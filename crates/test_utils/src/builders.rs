//! Test Data Builders
//!
//! Builds intake form states with realistic generated customer data. Tests
//! set only the fields they care about and get valid values for the rest.

use domain_recall::FormFields;
use fake::faker::address::en::{CityName, SecondaryAddress, StateAbbr, StreetName, ZipCode};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;

/// Builder for intake form states
pub struct FormFieldsBuilder {
    fields: FormFields,
}

impl Default for FormFieldsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FormFieldsBuilder {
    /// Creates a builder pre-filled with a valid, randomly generated customer
    pub fn new() -> Self {
        let street: String = StreetName().fake();
        let number: u16 = (1u16..9999u16).fake();

        Self {
            fields: FormFields {
                phone: format!("+1{}", (2_000_000_000u64..9_999_999_999u64).fake::<u64>()),
                model: format!("RY{}", (10_000u32..99_999u32).fake::<u32>()),
                serial: format!("AB{}", (100_000_000u64..999_999_999u64).fake::<u64>()),
                first_name: FirstName().fake(),
                last_name: LastName().fake(),
                email: SafeEmail().fake(),
                address1: format!("{} {}", number, street),
                address2: String::new(),
                city: CityName().fake(),
                state: StateAbbr().fake(),
                zip: ZipCode().fake(),
                consent: true,
            },
        }
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.fields.phone = phone.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.fields.model = model.into();
        self
    }

    pub fn serial(mut self, serial: impl Into<String>) -> Self {
        self.fields.serial = serial.into();
        self
    }

    pub fn name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.fields.first_name = first.into();
        self.fields.last_name = last.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.fields.email = email.into();
        self
    }

    pub fn address1(mut self, line1: impl Into<String>) -> Self {
        self.fields.address1 = line1.into();
        self
    }

    /// Fills the optional second address line with a generated value
    pub fn with_secondary_address(mut self) -> Self {
        self.fields.address2 = SecondaryAddress().fake();
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.fields.city = city.into();
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.fields.state = state.into();
        self
    }

    pub fn zip(mut self, zip: impl Into<String>) -> Self {
        self.fields.zip = zip.into();
        self
    }

    pub fn consent(mut self, consent: bool) -> Self {
        self.fields.consent = consent;
        self
    }

    /// Builds the form state
    pub fn build(self) -> FormFields {
        self.fields
    }
}
