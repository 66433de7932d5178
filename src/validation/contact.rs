use serde_json::Value;

use super::{validate, FieldRule, Mode};
use crate::error::ApiError;
use crate::models::{ContactChanges, NewContact};

/// `first_name`, `last_name`, `email` and `phone`; all required on create
pub const CONTACT_RULES: &[FieldRule] = &[
    FieldRule::string("first_name").required().max(100),
    FieldRule::string("last_name").required().max(100),
    FieldRule::string("email").required().max(255).email(),
    FieldRule::string("phone").required().max(20),
];

pub fn validate_new_contact(payload: &Value) -> Result<NewContact, ApiError> {
    let mut v = validate(payload, CONTACT_RULES, Mode::Create)?;
    Ok(NewContact {
        first_name: v.take_value("first_name").unwrap_or_default(),
        last_name: v.take_value("last_name").unwrap_or_default(),
        email: v.take_value("email").unwrap_or_default(),
        phone: v.take_value("phone").unwrap_or_default(),
    })
}

/// Same field set as create with every field optional
pub fn validate_contact_changes(payload: &Value) -> Result<ContactChanges, ApiError> {
    let mut v = validate(payload, CONTACT_RULES, Mode::Update)?;
    Ok(ContactChanges {
        first_name: v.take_value("first_name"),
        last_name: v.take_value("last_name"),
        email: v.take_value("email"),
        phone: v.take_value("phone"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_errors(err: ApiError) -> Vec<String> {
        match err {
            ApiError::ValidationError { field_errors, .. } => field_errors.into_keys().collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn create_ignores_user_id() {
        let payload = json!({
            "first_name": "John",
            "last_name": "Doe",
            "email": "john@example.com",
            "phone": "081234567890",
            "user_id": 99
        });
        let contact = validate_new_contact(&payload).unwrap();
        assert_eq!(contact.first_name, "John");
        assert_eq!(contact.phone, "081234567890");
    }

    #[test]
    fn create_rejects_bad_email() {
        let payload = json!({
            "first_name": "John",
            "last_name": "Doe",
            "email": "not-an-email",
            "phone": "081234567890"
        });
        assert_eq!(field_errors(validate_new_contact(&payload).unwrap_err()), vec!["email"]);
    }

    #[test]
    fn create_requires_all_fields() {
        let errors = field_errors(validate_new_contact(&json!({ "first_name": "John" })).unwrap_err());
        assert_eq!(errors, vec!["email", "last_name", "phone"]);
    }

    #[test]
    fn phone_limited_to_twenty_characters() {
        let payload = json!({ "phone": "0".repeat(21) });
        assert_eq!(field_errors(validate_contact_changes(&payload).unwrap_err()), vec!["phone"]);
    }

    #[test]
    fn email_limited_to_column_width() {
        let email = format!("{}@example.com", "a".repeat(300));
        let err = validate_contact_changes(&json!({ "email": email })).unwrap_err();
        match err {
            ApiError::ValidationError { field_errors, .. } => {
                assert_eq!(field_errors.len(), 1);
                assert_eq!(
                    field_errors["email"],
                    "The email field must not be greater than 255 characters."
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn update_accepts_single_field() {
        let changes = validate_contact_changes(&json!({ "last_name": "Smith" })).unwrap();
        assert_eq!(
            changes,
            ContactChanges {
                last_name: Some("Smith".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn update_rejects_null_first_name() {
        let errors = field_errors(validate_contact_changes(&json!({ "first_name": null })).unwrap_err());
        assert_eq!(errors, vec!["first_name"]);
    }
}
