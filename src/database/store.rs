use std::collections::HashMap;

use async_trait::async_trait;

use super::DatabaseError;
use crate::models::{Address, AddressChanges, Contact, ContactChanges, ContactRow, NewAddress, NewContact};

/// Persistence seam for contacts and their addresses.
///
/// Lookups resolve by id only. Ownership is decided by the caller after
/// the record has been resolved.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    /// Every contact owned by `user_id`, each with its addresses attached
    async fn list_contacts(&self, user_id: i64) -> Result<Vec<Contact>, DatabaseError>;

    async fn find_contact(&self, id: i64) -> Result<Option<Contact>, DatabaseError>;

    async fn create_contact(&self, user_id: i64, contact: NewContact) -> Result<Contact, DatabaseError>;

    /// Apply a partial update. An empty change set performs no write.
    async fn update_contact(&self, id: i64, changes: ContactChanges) -> Result<Contact, DatabaseError>;

    /// Hard delete; the contact's addresses go with it
    async fn delete_contact(&self, id: i64) -> Result<(), DatabaseError>;

    async fn list_addresses(&self, contact_id: i64) -> Result<Vec<Address>, DatabaseError>;

    async fn find_address(&self, id: i64) -> Result<Option<Address>, DatabaseError>;

    async fn create_address(&self, contact_id: i64, address: NewAddress) -> Result<Address, DatabaseError>;

    async fn update_address(&self, id: i64, changes: AddressChanges) -> Result<Address, DatabaseError>;

    async fn delete_address(&self, id: i64) -> Result<(), DatabaseError>;
}

/// Associate addresses with their contacts by `contact_id`, keeping contact order
pub fn attach_addresses(rows: Vec<ContactRow>, addresses: Vec<Address>) -> Vec<Contact> {
    let mut by_contact: HashMap<i64, Vec<Address>> = HashMap::new();
    for address in addresses {
        by_contact.entry(address.contact_id).or_default().push(address);
    }

    rows.into_iter()
        .map(|row| {
            let addresses = by_contact.remove(&row.id).unwrap_or_default();
            Contact::new(row, addresses)
        })
        .collect()
}

pub(crate) fn contact_not_found(id: i64) -> DatabaseError {
    DatabaseError::NotFound(format!("Contact {} not found", id))
}

pub(crate) fn address_not_found(id: i64) -> DatabaseError {
    DatabaseError::NotFound(format!("Address {} not found", id))
}
