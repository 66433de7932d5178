use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::Value;

use super::owned_contact;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::Contact;
use crate::state::AppState;
use crate::validation::{validate_contact_changes, validate_new_contact};

/// GET /contacts - every contact owned by the caller, addresses attached
pub async fn list(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Vec<Contact>> {
    let contacts = state.store.list_contacts(user.user_id).await?;
    Ok(ApiResponse::success(contacts))
}

/// POST /contacts - create a contact owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Contact> {
    let Json(payload) = payload?;
    let new_contact = validate_new_contact(&payload)?;

    let contact = state.store.create_contact(user.user_id, new_contact).await?;
    tracing::info!(contact_id = contact.id(), user_id = user.user_id, "Contact created");

    Ok(ApiResponse::created(contact))
}

/// GET /contacts/:id
pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Contact> {
    let contact = owned_contact(state.store.as_ref(), &user, &id).await?;
    Ok(ApiResponse::success(contact))
}

/// PUT|PATCH /contacts/:id - partial update of the supplied fields
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Contact> {
    let contact = owned_contact(state.store.as_ref(), &user, &id).await?;

    let Json(payload) = payload?;
    let changes = validate_contact_changes(&payload)?;

    let updated = state.store.update_contact(contact.id(), changes).await?;
    tracing::info!(contact_id = updated.id(), user_id = user.user_id, "Contact updated");

    Ok(ApiResponse::success(updated))
}

/// DELETE /contacts/:id
pub async fn destroy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let contact = owned_contact(state.store.as_ref(), &user, &id).await?;

    state.store.delete_contact(contact.id()).await?;
    tracing::info!(contact_id = contact.id(), user_id = user.user_id, "Contact deleted");

    Ok(ApiResponse::no_content())
}
