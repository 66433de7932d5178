use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::Value;

use super::{owned_contact, parse_id};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{Address, Contact};
use crate::state::AppState;
use crate::validation::{validate_address_changes, validate_new_address};

/// Resolve an address that must belong to the (already owned) contact
async fn contact_address(state: &AppState, contact: &Contact, raw_id: &str) -> Result<Address, ApiError> {
    let id = parse_id(raw_id, "Address")?;
    state
        .store
        .find_address(id)
        .await?
        .filter(|address| address.contact_id == contact.id())
        .ok_or_else(|| ApiError::not_found(format!("Address {} not found", id)))
}

/// GET /contacts/:id/addresses
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(contact_id): Path<String>,
) -> ApiResult<Vec<Address>> {
    let contact = owned_contact(state.store.as_ref(), &user, &contact_id).await?;
    let addresses = state.store.list_addresses(contact.id()).await?;
    Ok(ApiResponse::success(addresses))
}

/// POST /contacts/:id/addresses
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(contact_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Address> {
    let contact = owned_contact(state.store.as_ref(), &user, &contact_id).await?;

    let Json(payload) = payload?;
    let new_address = validate_new_address(&payload)?;

    let address = state.store.create_address(contact.id(), new_address).await?;
    tracing::info!(address_id = address.id, contact_id = contact.id(), "Address created");

    Ok(ApiResponse::created(address))
}

/// GET /contacts/:id/addresses/:address
pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((contact_id, address_id)): Path<(String, String)>,
) -> ApiResult<Address> {
    let contact = owned_contact(state.store.as_ref(), &user, &contact_id).await?;
    let address = contact_address(&state, &contact, &address_id).await?;
    Ok(ApiResponse::success(address))
}

/// PUT|PATCH /contacts/:id/addresses/:address
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((contact_id, address_id)): Path<(String, String)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Address> {
    let contact = owned_contact(state.store.as_ref(), &user, &contact_id).await?;
    let address = contact_address(&state, &contact, &address_id).await?;

    let Json(payload) = payload?;
    let changes = validate_address_changes(&payload)?;

    let updated = state.store.update_address(address.id, changes).await?;
    tracing::info!(address_id = updated.id, contact_id = contact.id(), "Address updated");

    Ok(ApiResponse::success(updated))
}

/// DELETE /contacts/:id/addresses/:address
pub async fn destroy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((contact_id, address_id)): Path<(String, String)>,
) -> ApiResult<()> {
    let contact = owned_contact(state.store.as_ref(), &user, &contact_id).await?;
    let address = contact_address(&state, &contact, &address_id).await?;

    state.store.delete_address(address.id).await?;
    tracing::info!(address_id = address.id, contact_id = contact.id(), "Address deleted");

    Ok(ApiResponse::no_content())
}

