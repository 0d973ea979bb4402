use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use std::fmt;

use crate::errors::InternalError;
use crate::types::db::restaurant::{self, RestaurantStatus};
use crate::types::db::restaurant_user_role;

/// Read access to restaurants and their user-role assignments
///
/// Every lookup here ignores soft-deleted restaurants.
pub struct RestaurantStore {
    db: DatabaseConnection,
}

impl RestaurantStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Find a live restaurant by id
    ///
    /// # Returns
    /// * `Ok(Some(Model))` - Restaurant exists and is not soft-deleted
    /// * `Ok(None)` - No such restaurant, or it was soft-deleted
    /// * `Err(InternalError)` - Database error
    pub async fn find_by_id(&self, id: i64) -> Result<Option<restaurant::Model>, InternalError> {
        restaurant::Entity::find_by_id(id)
            .filter(restaurant::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_restaurant_by_id", e))
    }

    /// All live restaurants, ordered by id
    pub async fn list_all(&self) -> Result<Vec<restaurant::Model>, InternalError> {
        restaurant::Entity::find()
            .filter(restaurant::Column::DeletedAt.is_null())
            .order_by_asc(restaurant::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_restaurants", e))
    }

    /// Assignment rows linking `user_id` to `restaurant_id`
    ///
    /// With `active_only` set, only rows that currently grant access are returned
    /// (flag set, not soft-deleted, not expired).
    pub async fn query_user_roles(
        &self,
        restaurant_id: i64,
        user_id: i64,
        active_only: bool,
    ) -> Result<Vec<restaurant_user_role::Model>, InternalError> {
        let mut query = restaurant_user_role::Entity::find()
            .filter(restaurant_user_role::Column::RestaurantId.eq(restaurant_id))
            .filter(restaurant_user_role::Column::UserId.eq(user_id));

        if active_only {
            query = query.filter(restaurant_user_role::active_at(Utc::now().timestamp()));
        }

        query
            .order_by_asc(restaurant_user_role::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("query_user_roles", e))
    }

    /// Whether `user_id` currently holds an active assignment to `restaurant_id`
    pub async fn has_active_assignment(
        &self,
        restaurant_id: i64,
        user_id: i64,
    ) -> Result<bool, InternalError> {
        let count = restaurant_user_role::Entity::find()
            .filter(restaurant_user_role::Column::RestaurantId.eq(restaurant_id))
            .filter(restaurant_user_role::Column::UserId.eq(user_id))
            .filter(restaurant_user_role::active_at(Utc::now().timestamp()))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("has_active_assignment", e))?;

        Ok(count > 0)
    }

    /// The live restaurant of `user_id`'s earliest active assignment
    ///
    /// A user with several active assignments always gets the one with the
    /// lowest assignment id.
    pub async fn find_assigned_restaurant(
        &self,
        user_id: i64,
    ) -> Result<Option<restaurant::Model>, InternalError> {
        restaurant::Entity::find()
            .join(JoinType::InnerJoin, restaurant::Relation::RestaurantUserRole.def())
            .filter(restaurant::Column::DeletedAt.is_null())
            .filter(restaurant_user_role::Column::UserId.eq(user_id))
            .filter(restaurant_user_role::active_at(Utc::now().timestamp()))
            .order_by_asc(restaurant_user_role::Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_assigned_restaurant", e))
    }

    /// Create a new active restaurant
    pub async fn create(&self, name: &str, slug: &str) -> Result<restaurant::Model, InternalError> {
        let now = Utc::now().timestamp();
        let new_restaurant = restaurant::ActiveModel {
            name: Set(name.to_string()),
            slug: Set(slug.to_string()),
            status: Set(RestaurantStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let created = new_restaurant
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("create_restaurant", e))?;

        tracing::info!("Created restaurant {} ({})", created.id, created.slug);
        Ok(created)
    }

    /// Mark a restaurant as deleted
    ///
    /// # Returns
    /// * `Ok(true)` - Restaurant was live and is now soft-deleted
    /// * `Ok(false)` - No live restaurant with that id
    pub async fn soft_delete(&self, id: i64) -> Result<bool, InternalError> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(false);
        };

        let now = Utc::now().timestamp();
        let mut active: restaurant::ActiveModel = existing.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("soft_delete_restaurant", e))?;

        tracing::info!("Soft-deleted restaurant {}", id);
        Ok(true)
    }
}

impl fmt::Debug for RestaurantStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestaurantStore")
            .field("db", &"<connection>")
            .finish()
    }
}
