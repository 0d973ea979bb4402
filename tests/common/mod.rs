// Common test utilities for integration tests
#![allow(dead_code)]

use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use restaurant_access::app_data::AppData;
use restaurant_access::config::{BootstrapSettings, EnvironmentProvider, SecretManager};
use restaurant_access::providers::TokenProvider;
use restaurant_access::types::db::restaurant;
use restaurant_access::types::internal::PrincipalRole;
use restaurant_access::types::internal::context::RequestContext;
use restaurant_access::types::internal::Principal;
use restaurant_access::types::db::restaurant_user_role::AssignmentRole;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use std::collections::HashMap;
use std::sync::Arc;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-characters";

/// Environment backed by a fixed map instead of the process environment
pub struct TestEnvironment {
    vars: HashMap<String, String>,
}

impl TestEnvironment {
    pub fn new(vars: &[(&str, &str)]) -> Self {
        Self {
            vars: vars
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        }
    }
}

impl EnvironmentProvider for TestEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Creates a test database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// AppData over a fresh database, configured from the given variables
pub async fn setup_app_data(vars: &[(&str, &str)]) -> Arc<AppData> {
    let db = setup_test_db().await;
    let settings = BootstrapSettings::from_env_provider(Arc::new(TestEnvironment::new(vars)))
        .expect("Invalid test settings");
    let secret_manager = Arc::new(SecretManager::new(TEST_JWT_SECRET).expect("Invalid test secret"));

    Arc::new(AppData::new(db, secret_manager, &settings))
}

pub fn token_for(token_provider: &TokenProvider, user_id: i64, roles: &[PrincipalRole]) -> String {
    token_provider
        .generate_jwt(user_id, roles)
        .expect("Failed to issue test token")
        .0
}

pub fn admin(id: i64) -> Principal {
    Principal::new(id, [PrincipalRole::Admin])
}

pub fn manager(id: i64) -> Principal {
    Principal::new(id, [PrincipalRole::RestaurantManager])
}

pub fn staff(id: i64) -> Principal {
    Principal::new(id, [PrincipalRole::Staff])
}

pub async fn create_restaurant(app_data: &AppData, slug: &str) -> restaurant::Model {
    app_data
        .restaurant_store
        .create(slug, slug)
        .await
        .expect("Failed to create restaurant")
}

/// Restaurant row with a fixed id
pub async fn create_restaurant_with_id(app_data: &AppData, id: i64, slug: &str) -> restaurant::Model {
    let now = Utc::now().timestamp();
    restaurant::ActiveModel {
        id: Set(id),
        name: Set(slug.to_string()),
        slug: Set(slug.to_string()),
        status: Set(restaurant::RestaurantStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
    .insert(&app_data.db)
    .await
    .expect("Failed to create restaurant")
}

pub async fn assign_manager(app_data: &AppData, restaurant_id: i64, user_id: i64) {
    app_data
        .assignment_store
        .assign(
            &RequestContext::for_system("test_seed"),
            restaurant_id,
            user_id,
            AssignmentRole::RestaurantManager,
            None,
        )
        .await
        .expect("Failed to assign manager");
}
