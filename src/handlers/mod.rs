// Request handlers. Every protected handler takes the principal explicitly as
// `Extension<AuthUser>`; nothing reads an ambient "current user".

pub mod addresses;
pub mod contacts;
pub mod health;

use crate::database::ContactStore;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::Contact;

/// Path ids that are not integers can never resolve to a record
pub(crate) fn parse_id(raw: &str, kind: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::not_found(format!("{} {} not found", kind, raw)))
}

/// Resolve a contact by id, then check that `user` owns it.
///
/// Existence is decided first (404), ownership second (403).
pub(crate) async fn owned_contact(
    store: &dyn ContactStore,
    user: &AuthUser,
    raw_id: &str,
) -> Result<Contact, ApiError> {
    let id = parse_id(raw_id, "Contact")?;
    let contact = store
        .find_contact(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Contact {} not found", id)))?;

    if !contact.is_owned_by(user.user_id) {
        tracing::warn!(
            contact_id = id,
            owner_id = contact.user_id(),
            user_id = user.user_id,
            "Ownership check failed"
        );
        return Err(ApiError::forbidden());
    }

    Ok(contact)
}
