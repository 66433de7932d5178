use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Address {
    pub id: i64,
    pub contact_id: i64,
    pub street: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: String,
    pub postal_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub country: String,
    pub postal_code: Option<String>,
}

/// Partial address update.
///
/// Nullable columns use a nested option: `Some(None)` clears the column,
/// `None` leaves it as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressChanges {
    pub street: Option<Option<String>>,
    pub city: Option<Option<String>>,
    pub province: Option<Option<String>>,
    pub country: Option<String>,
    pub postal_code: Option<Option<String>>,
}

impl AddressChanges {
    pub fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.city.is_none()
            && self.province.is_none()
            && self.country.is_none()
            && self.postal_code.is_none()
    }

    pub fn apply(&self, address: &mut Address) {
        if let Some(v) = &self.street {
            address.street = v.clone();
        }
        if let Some(v) = &self.city {
            address.city = v.clone();
        }
        if let Some(v) = &self.province {
            address.province = v.clone();
        }
        if let Some(v) = &self.country {
            address.country = v.clone();
        }
        if let Some(v) = &self.postal_code {
            address.postal_code = v.clone();
        }
    }
}
