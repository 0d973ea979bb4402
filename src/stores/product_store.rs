use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Select};
use std::fmt;

use crate::errors::InternalError;
use crate::types::db::product;

/// Products belonging to restaurants
///
/// Listing is split into building a query and running it so callers can
/// narrow the query to a principal's scope in between.
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Base listing query, optionally limited to one restaurant
    pub fn query_for_restaurant(&self, restaurant_id: Option<i64>) -> Select<product::Entity> {
        let query = product::Entity::find().order_by_asc(product::Column::Id);
        match restaurant_id {
            Some(id) => query.filter(product::Column::RestaurantId.eq(id)),
            None => query,
        }
    }

    pub async fn fetch(&self, query: Select<product::Entity>) -> Result<Vec<product::Model>, InternalError> {
        query
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_products", e))
    }

    pub async fn create(
        &self,
        restaurant_id: i64,
        name: &str,
        price_cents: i64,
    ) -> Result<product::Model, InternalError> {
        let now = Utc::now().timestamp();
        product::ActiveModel {
            restaurant_id: Set(restaurant_id),
            name: Set(name.to_string()),
            price_cents: Set(price_cents),
            is_available: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| InternalError::database("create_product", e))
    }
}

impl fmt::Debug for ProductStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductStore")
            .field("db", &"<connection>")
            .finish()
    }
}
