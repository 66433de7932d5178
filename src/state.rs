use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::database::ContactStore;

/// Shared handler state, cloned into every request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContactStore>,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(store: Arc<dyn ContactStore>, jwt: JwtKeys) -> Self {
        Self { store, jwt }
    }
}
