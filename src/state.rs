use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenService};
use crate::config::Config;
use crate::store::Store;

/// Shared, read-only handles passed to every handler through `web::Data`.
///
/// The store is the only shared mutable resource, and it manages its own
/// synchronisation.
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenService,
    pub hasher: PasswordHasher,
}

impl AppState {
    pub fn new(config: &Config, store: Arc<dyn Store>) -> Self {
        Self {
            store,
            tokens: TokenService::from_config(config),
            hasher: PasswordHasher::new(config.bcrypt_cost),
        }
    }
}
