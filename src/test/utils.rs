// Test utilities shared across unit tests
// Only compiled when running tests

use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection};
use std::sync::Arc;

use crate::app_data::AppData;
use crate::config::{BootstrapSettings, MockEnvironment, SecretManager};
use crate::providers::TokenProvider;
use crate::stores::{AssignmentStore, ProductStore, RestaurantStore};
use crate::types::db::restaurant_user_role::{self, AssignmentRole};
use crate::types::internal::context::RequestContext;
use crate::types::internal::{Principal, PrincipalRole};

pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-characters-long";

/// Creates an in-memory database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Creates a test database and stores
///
/// Returns (db, restaurant_store, assignment_store, product_store)
///
/// Callers can discard what they don't need:
/// ```rust
/// let (_db, restaurant_store, _assignment_store, _product_store) = setup_test_stores().await;
/// ```
pub async fn setup_test_stores() -> (
    DatabaseConnection,
    Arc<RestaurantStore>,
    Arc<AssignmentStore>,
    Arc<ProductStore>,
) {
    let db = setup_test_db().await;

    (
        db.clone(),
        Arc::new(RestaurantStore::new(db.clone())),
        Arc::new(AssignmentStore::new(db.clone())),
        Arc::new(ProductStore::new(db)),
    )
}

pub fn create_test_token_provider() -> TokenProvider {
    let secret_manager = Arc::new(SecretManager::new(TEST_JWT_SECRET).expect("Invalid test secret"));
    TokenProvider::new(secret_manager, 15)
}

/// Full AppData over a fresh database, configured from the given variables
pub async fn setup_test_app_data(vars: &[(&str, &str)]) -> Arc<AppData> {
    let db = setup_test_db().await;
    let settings = BootstrapSettings::from_env_provider(Arc::new(MockEnvironment::empty().with_vars(vars)))
        .expect("Invalid test settings");
    let secret_manager = Arc::new(SecretManager::new(TEST_JWT_SECRET).expect("Invalid test secret"));

    Arc::new(AppData::new(db, secret_manager, &settings))
}

/// API context carrying an admin principal
pub fn admin_context(id: i64) -> RequestContext {
    RequestContext::new().with_principal(Principal::new(id, [PrincipalRole::Admin]))
}

/// Insert an assignment row directly, bypassing the store's validation
pub async fn insert_assignment(
    db: &DatabaseConnection,
    restaurant_id: i64,
    user_id: i64,
    role: AssignmentRole,
    is_active: bool,
    expires_at: Option<i64>,
) -> restaurant_user_role::Model {
    let now = Utc::now().timestamp();
    restaurant_user_role::ActiveModel {
        restaurant_id: Set(restaurant_id),
        user_id: Set(user_id),
        role: Set(role),
        is_active: Set(is_active),
        expires_at: Set(expires_at),
        assigned_by: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert assignment")
}
