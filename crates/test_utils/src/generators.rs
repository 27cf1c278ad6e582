//! Property-Based Test Generators
//!
//! Provides proptest strategies for intake form data that respect (or
//! deliberately break) the validation rules.

use domain_recall::FormFields;
use proptest::prelude::*;

/// Strategy for phones matching the loose E.164 pattern
pub fn valid_phone_strategy() -> impl Strategy<Value = String> {
    r"\+?[1-9][0-9]{7,14}"
}

/// Strategy for phones the loose E.164 check must reject
pub fn invalid_phone_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        r"\+?0[0-9]{7,14}",
        r"\+?[1-9][0-9]{0,6}",
        r"\+?[1-9][0-9]{15,20}",
        r"[1-9][0-9]{3}[ \-.][0-9]{4,8}",
    ]
}

/// Strategy for whitespace-only strings (including the empty string)
pub fn blank_strategy() -> impl Strategy<Value = String> {
    r"[ \t]{0,4}"
}

/// Strategy for a required text value with optional padding
pub fn padded_text_strategy() -> impl Strategy<Value = String> {
    (r"[ ]{0,3}", r"[A-Za-z0-9][A-Za-z0-9 ]{0,10}[A-Za-z0-9]", r"[ ]{0,3}")
        .prop_map(|(pre, text, post)| format!("{}{}{}", pre, text, post))
}

/// Strategy for two-letter state codes in either case, possibly padded
///
/// Includes accented letters whose uppercase form is a single character.
pub fn state_code_strategy() -> impl Strategy<Value = String> {
    (r"[ ]{0,2}", r"[A-Za-zéèàüöÉÈÀÜÖ]{2}", r"[ ]{0,2}")
        .prop_map(|(pre, code, post)| format!("{}{}{}", pre, code, post))
}

/// Strategy for simple valid email addresses
pub fn email_strategy() -> impl Strategy<Value = String> {
    (r"[a-z][a-z0-9.]{0,10}", r"[a-z]{2,10}", r"[a-z]{2,4}")
        .prop_map(|(local, domain, tld)| format!("{}@{}.{}", local, domain, tld))
}

/// Strategy for complete, valid form states with untidy casing and padding
pub fn valid_form_strategy() -> impl Strategy<Value = FormFields> {
    (
        (valid_phone_strategy(), padded_text_strategy(), padded_text_strategy()),
        (padded_text_strategy(), padded_text_strategy(), email_strategy()),
        (
            padded_text_strategy(),
            padded_text_strategy(),
            state_code_strategy(),
            r"[0-9]{5}",
        ),
    )
        .prop_map(
            |((phone, model, serial), (first_name, last_name, email), (address1, city, state, zip))| {
                FormFields {
                    phone,
                    model,
                    serial,
                    first_name,
                    last_name,
                    email,
                    address1,
                    address2: String::new(),
                    city,
                    state,
                    zip,
                    consent: true,
                }
            },
        )
}
