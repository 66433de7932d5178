use async_trait::async_trait;
use sqlx::PgPool;

use super::store::{address_not_found, attach_addresses, contact_not_found, ContactStore};
use super::{DatabaseError, DatabaseManager};
use crate::models::{Address, AddressChanges, Contact, ContactChanges, ContactRow, NewAddress, NewContact};

const CONTACT_COLUMNS: &str = "id, user_id, first_name, last_name, email, phone, created_at, updated_at";
const ADDRESS_COLUMNS: &str =
    "id, contact_id, street, city, province, country, postal_code, created_at, updated_at";

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgContactStore {
    pool: PgPool,
}

impl PgContactStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn addresses_for(&self, contact_ids: &[i64]) -> Result<Vec<Address>, DatabaseError> {
        if contact_ids.is_empty() {
            return Ok(vec![]);
        }
        let sql = format!(
            "SELECT {} FROM addresses WHERE contact_id = ANY($1) ORDER BY id",
            ADDRESS_COLUMNS
        );
        let rows = sqlx::query_as::<_, Address>(&sql)
            .bind(contact_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn with_addresses(&self, row: ContactRow) -> Result<Contact, DatabaseError> {
        let addresses = self.addresses_for(&[row.id]).await?;
        Ok(Contact::new(row, addresses))
    }
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn list_contacts(&self, user_id: i64) -> Result<Vec<Contact>, DatabaseError> {
        let sql = format!("SELECT {} FROM contacts WHERE user_id = $1 ORDER BY id", CONTACT_COLUMNS);
        let rows = sqlx::query_as::<_, ContactRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let addresses = self.addresses_for(&ids).await?;
        Ok(attach_addresses(rows, addresses))
    }

    async fn find_contact(&self, id: i64) -> Result<Option<Contact>, DatabaseError> {
        let sql = format!("SELECT {} FROM contacts WHERE id = $1", CONTACT_COLUMNS);
        let row = sqlx::query_as::<_, ContactRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.with_addresses(row).await?)),
            None => Ok(None),
        }
    }

    async fn create_contact(&self, user_id: i64, contact: NewContact) -> Result<Contact, DatabaseError> {
        let sql = format!(
            "INSERT INTO contacts (user_id, first_name, last_name, email, phone) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            CONTACT_COLUMNS
        );
        let row = sqlx::query_as::<_, ContactRow>(&sql)
            .bind(user_id)
            .bind(&contact.first_name)
            .bind(&contact.last_name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .fetch_one(&self.pool)
            .await?;

        Ok(Contact::new(row, vec![]))
    }

    async fn update_contact(&self, id: i64, changes: ContactChanges) -> Result<Contact, DatabaseError> {
        if changes.is_empty() {
            return self.find_contact(id).await?.ok_or_else(|| contact_not_found(id));
        }

        let sql = format!(
            "UPDATE contacts SET \
                first_name = COALESCE($2, first_name), \
                last_name = COALESCE($3, last_name), \
                email = COALESCE($4, email), \
                phone = COALESCE($5, phone), \
                updated_at = now() \
             WHERE id = $1 RETURNING {}",
            CONTACT_COLUMNS
        );
        let row = sqlx::query_as::<_, ContactRow>(&sql)
            .bind(id)
            .bind(&changes.first_name)
            .bind(&changes.last_name)
            .bind(&changes.email)
            .bind(&changes.phone)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| contact_not_found(id))?;

        self.with_addresses(row).await
    }

    async fn delete_contact(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(contact_not_found(id));
        }
        Ok(())
    }

    async fn list_addresses(&self, contact_id: i64) -> Result<Vec<Address>, DatabaseError> {
        self.addresses_for(&[contact_id]).await
    }

    async fn find_address(&self, id: i64) -> Result<Option<Address>, DatabaseError> {
        let sql = format!("SELECT {} FROM addresses WHERE id = $1", ADDRESS_COLUMNS);
        let row = sqlx::query_as::<_, Address>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_address(&self, contact_id: i64, address: NewAddress) -> Result<Address, DatabaseError> {
        let sql = format!(
            "INSERT INTO addresses (contact_id, street, city, province, country, postal_code) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            ADDRESS_COLUMNS
        );
        let row = sqlx::query_as::<_, Address>(&sql)
            .bind(contact_id)
            .bind(&address.street)
            .bind(&address.city)
            .bind(&address.province)
            .bind(&address.country)
            .bind(&address.postal_code)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_address(&self, id: i64, changes: AddressChanges) -> Result<Address, DatabaseError> {
        let mut address = self.find_address(id).await?.ok_or_else(|| address_not_found(id))?;
        if changes.is_empty() {
            return Ok(address);
        }
        changes.apply(&mut address);

        let sql = format!(
            "UPDATE addresses SET street = $2, city = $3, province = $4, country = $5, \
                postal_code = $6, updated_at = now() \
             WHERE id = $1 RETURNING {}",
            ADDRESS_COLUMNS
        );
        let row = sqlx::query_as::<_, Address>(&sql)
            .bind(id)
            .bind(&address.street)
            .bind(&address.city)
            .bind(&address.province)
            .bind(&address.country)
            .bind(&address.postal_code)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| address_not_found(id))?;
        Ok(row)
    }

    async fn delete_address(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(address_not_found(id));
        }
        Ok(())
    }
}
