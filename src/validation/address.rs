use serde_json::Value;

use super::{validate, FieldRule, Mode};
use crate::error::ApiError;
use crate::models::{AddressChanges, NewAddress};

pub const ADDRESS_RULES: &[FieldRule] = &[
    FieldRule::string("street").nullable().max(255),
    FieldRule::string("city").nullable().max(100),
    FieldRule::string("province").nullable().max(100),
    FieldRule::string("country").required().max(100),
    FieldRule::string("postal_code").nullable().max(10),
];

pub fn validate_new_address(payload: &Value) -> Result<NewAddress, ApiError> {
    let mut v = validate(payload, ADDRESS_RULES, Mode::Create)?;
    Ok(NewAddress {
        street: v.take_value("street"),
        city: v.take_value("city"),
        province: v.take_value("province"),
        country: v.take_value("country").unwrap_or_default(),
        postal_code: v.take_value("postal_code"),
    })
}

/// Partial update; `country` may be omitted but never cleared
pub fn validate_address_changes(payload: &Value) -> Result<AddressChanges, ApiError> {
    let mut v = validate(payload, ADDRESS_RULES, Mode::Update)?;
    Ok(AddressChanges {
        street: v.take("street"),
        city: v.take("city"),
        province: v.take("province"),
        country: v.take_value("country"),
        postal_code: v.take("postal_code"),
    })
}
