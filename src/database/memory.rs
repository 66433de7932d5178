use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::store::{address_not_found, attach_addresses, contact_not_found, ContactStore};
use super::DatabaseError;
use crate::models::{Address, AddressChanges, Contact, ContactChanges, ContactRow, NewAddress, NewContact};

#[derive(Default)]
struct Tables {
    contacts: BTreeMap<i64, ContactRow>,
    addresses: BTreeMap<i64, Address>,
    next_contact_id: i64,
    next_address_id: i64,
}

impl Tables {
    fn addresses_of(&self, contact_id: i64) -> Vec<Address> {
        self.addresses
            .values()
            .filter(|a| a.contact_id == contact_id)
            .cloned()
            .collect()
    }

    fn contact(&self, id: i64) -> Option<Contact> {
        self.contacts
            .get(&id)
            .map(|row| Contact::new(row.clone(), self.addresses_of(id)))
    }
}

/// Process-local store used by the test suite and by `serve` when no
/// `DATABASE_URL` is configured. Ids are assigned sequentially from 1.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn list_contacts(&self, user_id: i64) -> Result<Vec<Contact>, DatabaseError> {
        let tables = self.tables.read().await;
        let rows: Vec<ContactRow> = tables
            .contacts
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        let ids: BTreeSet<i64> = rows.iter().map(|r| r.id).collect();
        let addresses = tables
            .addresses
            .values()
            .filter(|a| ids.contains(&a.contact_id))
            .cloned()
            .collect();
        Ok(attach_addresses(rows, addresses))
    }

    async fn find_contact(&self, id: i64) -> Result<Option<Contact>, DatabaseError> {
        Ok(self.tables.read().await.contact(id))
    }

    async fn create_contact(&self, user_id: i64, contact: NewContact) -> Result<Contact, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.next_contact_id += 1;
        let now = Utc::now();
        let row = ContactRow {
            id: tables.next_contact_id,
            user_id,
            first_name: contact.first_name,
            last_name: Some(contact.last_name),
            email: Some(contact.email),
            phone: Some(contact.phone),
            created_at: now,
            updated_at: now,
        };
        tables.contacts.insert(row.id, row.clone());
        Ok(Contact::new(row, vec![]))
    }

    async fn update_contact(&self, id: i64, changes: ContactChanges) -> Result<Contact, DatabaseError> {
        let mut tables = self.tables.write().await;
        let row = tables.contacts.get_mut(&id).ok_or_else(|| contact_not_found(id))?;
        if !changes.is_empty() {
            changes.apply(row);
            row.updated_at = Utc::now();
        }
        tables.contact(id).ok_or_else(|| contact_not_found(id))
    }

    async fn delete_contact(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.contacts.remove(&id).is_none() {
            return Err(contact_not_found(id));
        }
        tables.addresses.retain(|_, a| a.contact_id != id);
        Ok(())
    }

    async fn list_addresses(&self, contact_id: i64) -> Result<Vec<Address>, DatabaseError> {
        Ok(self.tables.read().await.addresses_of(contact_id))
    }

    async fn find_address(&self, id: i64) -> Result<Option<Address>, DatabaseError> {
        Ok(self.tables.read().await.addresses.get(&id).cloned())
    }

    async fn create_address(&self, contact_id: i64, address: NewAddress) -> Result<Address, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.contacts.contains_key(&contact_id) {
            return Err(contact_not_found(contact_id));
        }
        tables.next_address_id += 1;
        let now = Utc::now();
        let row = Address {
            id: tables.next_address_id,
            contact_id,
            street: address.street,
            city: address.city,
            province: address.province,
            country: address.country,
            postal_code: address.postal_code,
            created_at: now,
            updated_at: now,
        };
        tables.addresses.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_address(&self, id: i64, changes: AddressChanges) -> Result<Address, DatabaseError> {
        let mut tables = self.tables.write().await;
        let address = tables.addresses.get_mut(&id).ok_or_else(|| address_not_found(id))?;
        if !changes.is_empty() {
            changes.apply(address);
            address.updated_at = Utc::now();
        }
        Ok(address.clone())
    }

    async fn delete_address(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.addresses.remove(&id).map(|_| ()).ok_or_else(|| address_not_found(id))
    }
}
