use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Address;

/// A contact as stored in the `contacts` table, without its addresses
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactRow {
    pub id: i64,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A contact together with its eagerly loaded addresses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    #[serde(flatten)]
    pub row: ContactRow,
    pub addresses: Vec<Address>,
}

impl Contact {
    pub fn new(row: ContactRow, addresses: Vec<Address>) -> Self {
        Self { row, addresses }
    }

    pub fn id(&self) -> i64 {
        self.row.id
    }

    pub fn user_id(&self) -> i64 {
        self.row.user_id
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.row.user_id == user_id
    }
}

/// Validated fields for a new contact. The owner is supplied separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// Validated partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ContactChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none() && self.phone.is_none()
    }

    /// Apply the supplied fields onto an in-memory row
    pub fn apply(&self, row: &mut ContactRow) {
        if let Some(v) = &self.first_name {
            row.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            row.last_name = Some(v.clone());
        }
        if let Some(v) = &self.email {
            row.email = Some(v.clone());
        }
        if let Some(v) = &self.phone {
            row.phone = Some(v.clone());
        }
    }
}
