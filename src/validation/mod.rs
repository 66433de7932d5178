//! Request payload validation.
//!
//! Payloads arrive as raw JSON objects and are checked field by field against
//! a static rule table. String input is trimmed and an empty string counts as
//! absent (`null`), so `"   "` fails a required rule. Keys without a rule are
//! ignored, which is how `user_id` and other server-owned columns are kept out
//! of client control.

pub mod address;
pub mod contact;

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::{ApiError, FieldErrors};

pub use address::{validate_address_changes, validate_new_address};
pub use contact::{validate_contact_changes, validate_new_contact};

const INVALID_MESSAGE: &str = "The given data was invalid.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Required rules apply to absent fields
    Create,
    /// Absent fields are skipped
    Update,
}

/// Constraints for a single string field
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub required: bool,
    pub nullable: bool,
    pub max: Option<usize>,
    pub email: bool,
}

impl FieldRule {
    pub const fn string(field: &'static str) -> Self {
        Self {
            field,
            required: false,
            nullable: false,
            max: None,
            email: false,
        }
    }

    pub const fn required(self) -> Self {
        Self { required: true, ..self }
    }

    pub const fn nullable(self) -> Self {
        Self { nullable: true, ..self }
    }

    pub const fn max(self, max: usize) -> Self {
        Self { max: Some(max), ..self }
    }

    pub const fn email(self) -> Self {
        Self { email: true, ..self }
    }

    fn label(&self) -> String {
        self.field.replace('_', " ")
    }

    /// Check one field. `Ok(None)` means the field was absent and is skipped.
    fn check(&self, raw: Option<&Value>, mode: Mode) -> Result<Option<Option<String>>, String> {
        let value = match raw {
            None if self.required && mode == Mode::Create => {
                return Err(format!("The {} field is required.", self.label()))
            }
            None => return Ok(None),
            Some(Value::Null) => None,
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Some(_) => return Err(format!("The {} field must be a string.", self.label())),
        };

        let Some(value) = value else {
            if self.required {
                return Err(format!("The {} field is required.", self.label()));
            }
            if self.nullable {
                return Ok(Some(None));
            }
            return Err(format!("The {} field must be a string.", self.label()));
        };

        if let Some(max) = self.max {
            if value.chars().count() > max {
                return Err(format!(
                    "The {} field must not be greater than {} characters.",
                    self.label(),
                    max
                ));
            }
        }

        if self.email && !is_valid_email(&value) {
            return Err(format!("The {} field must be a valid email address.", self.label()));
        }

        Ok(Some(Some(value)))
    }
}

/// Fields that passed validation. Absent fields have no entry; an explicit
/// `null` on a nullable field is stored as `None`.
#[derive(Debug, Default)]
pub struct Validated {
    values: BTreeMap<&'static str, Option<String>>,
}

impl Validated {
    /// `None` when absent, `Some(None)` when explicitly cleared
    pub fn take(&mut self, field: &str) -> Option<Option<String>> {
        self.values.remove(field)
    }

    /// Present, non-null value
    pub fn take_value(&mut self, field: &str) -> Option<String> {
        self.take(field).flatten()
    }
}

/// Run every rule against the payload, collecting all violations
pub fn validate(payload: &Value, rules: &[FieldRule], mode: Mode) -> Result<Validated, ApiError> {
    let object: &Map<String, Value> = payload
        .as_object()
        .ok_or_else(|| ApiError::invalid_json("Request body must be a JSON object"))?;

    let mut validated = Validated::default();
    let mut errors = FieldErrors::new();

    for rule in rules {
        match rule.check(object.get(rule.field), mode) {
            Ok(Some(value)) => {
                validated.values.insert(rule.field, value);
            }
            Ok(None) => {}
            Err(message) => {
                errors.insert(rule.field.to_string(), message);
            }
        }
    }

    if errors.is_empty() {
        Ok(validated)
    } else {
        tracing::debug!("Validation failed for fields: {:?}", errors.keys().collect::<Vec<_>>());
        Err(ApiError::validation_error(INVALID_MESSAGE, errors))
    }
}

/// Basic email format check: a single `@`, a non-empty local part and a
/// dotted domain whose labels are non-empty.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RULES: &[FieldRule] = &[
        FieldRule::string("name").required().max(5),
        FieldRule::string("note").nullable().max(3),
        FieldRule::string("email").email(),
    ];

    #[test]
    fn accepts_valid_emails() {
        assert!(is_valid_email("john@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.co.id"));
    }

    #[test]
    fn rejects_invalid_emails() {
        for email in ["not-an-email", "a@b", "@example.com", "a@@example.com", "a b@example.com", "a@.com", "a@example."] {
            assert!(!is_valid_email(email), "{} should be invalid", email);
        }
    }

    #[test]
    fn create_mode_requires_required_fields() {
        let err = validate(&json!({}), RULES, Mode::Create).unwrap_err();
        match err {
            ApiError::ValidationError { field_errors, .. } => {
                assert_eq!(field_errors.len(), 1);
                assert_eq!(field_errors["name"], "The name field is required.");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn update_mode_skips_absent_fields() {
        let mut v = validate(&json!({ "note": "ok" }), RULES, Mode::Update).unwrap();
        assert_eq!(v.take("name"), None);
        assert_eq!(v.take_value("note").as_deref(), Some("ok"));
    }

    #[test]
    fn collects_every_violation() {
        let payload = json!({ "name": "toolong", "note": 5, "email": "nope" });
        let err = validate(&payload, RULES, Mode::Create).unwrap_err();
        let ApiError::ValidationError { field_errors, .. } = err else {
            panic!("expected validation error");
        };
        assert_eq!(field_errors.len(), 3);
        assert!(field_errors["name"].contains("5 characters"));
        assert!(field_errors["note"].contains("must be a string"));
        assert!(field_errors["email"].contains("valid email"));
    }

    #[test]
    fn max_counts_characters_not_bytes() {
        let v = validate(&json!({ "name": "Ñandú" }), RULES, Mode::Create);
        assert!(v.is_ok());
    }

    #[test]
    fn blank_strings_count_as_null() {
        let mut v = validate(&json!({ "name": " Ann ", "note": "  " }), RULES, Mode::Create).unwrap();
        assert_eq!(v.take_value("name").as_deref(), Some("Ann"));
        assert_eq!(v.take("note"), Some(None));

        let err = validate(&json!({ "name": "   " }), RULES, Mode::Update).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn non_object_payload_is_invalid_json() {
        let err = validate(&json!([1, 2]), RULES, Mode::Create).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_JSON");
    }
}
