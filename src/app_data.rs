use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::{BootstrapSettings, SecretManager};
use crate::providers::{AccessProvider, ScopeProvider, TokenProvider};
use crate::stores::{AssignmentStore, ProductStore, RestaurantStore};

/// Centralized application data following the main-owned stores pattern
///
/// Everything is created once in main.rs and shared, read-only, with the
/// HTTP layer and the CLI.
///
/// ```text
/// main.rs
///   ↓
/// AppData::new(db, secret_manager, settings)
///   ├─ restaurant_store ─┬─ access_provider
///   │                    └─ scope_provider
///   ├─ assignment_store
///   ├─ product_store
///   └─ token_provider (secret_manager)
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub secret_manager: Arc<SecretManager>,

    /// Redirect target for unauthenticated requests hitting a gated route
    pub login_url: Option<String>,

    pub restaurant_store: Arc<RestaurantStore>,
    pub assignment_store: Arc<AssignmentStore>,
    pub product_store: Arc<ProductStore>,

    pub token_provider: Arc<TokenProvider>,
    pub access_provider: Arc<AccessProvider>,
    pub scope_provider: Arc<ScopeProvider>,
}

impl AppData {
    /// Wire stores and providers around an already-migrated connection
    pub fn new(
        db: DatabaseConnection,
        secret_manager: Arc<SecretManager>,
        settings: &BootstrapSettings,
    ) -> Self {
        tracing::debug!("Creating stores...");
        let restaurant_store = Arc::new(RestaurantStore::new(db.clone()));
        let assignment_store = Arc::new(AssignmentStore::new(db.clone()));
        let product_store = Arc::new(ProductStore::new(db.clone()));

        tracing::debug!("Creating providers...");
        let token_provider = Arc::new(TokenProvider::new(
            secret_manager.clone(),
            settings.jwt_expiration_minutes(),
        ));
        let access_provider = Arc::new(AccessProvider::new(
            restaurant_store.clone(),
            settings.unscoped_policy(),
        ));
        let scope_provider = Arc::new(ScopeProvider::new(restaurant_store.clone()));

        tracing::info!(
            "AppData initialized (unscoped policy: {:?}, login redirect: {})",
            settings.unscoped_policy(),
            settings.login_url().unwrap_or("none")
        );

        Self {
            db,
            secret_manager,
            login_url: settings.login_url().map(str::to_string),
            restaurant_store,
            assignment_store,
            product_store,
            token_provider,
            access_provider,
            scope_provider,
        }
    }
}
