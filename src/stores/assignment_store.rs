use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::fmt;

use crate::audit;
use crate::errors::InternalError;
use crate::errors::internal::AssignmentError;
use crate::types::db::restaurant;
use crate::types::db::restaurant_user_role::{self, AssignmentRole};
use crate::types::internal::audit::EventType;
use crate::types::internal::context::RequestContext;

/// Manages the lifecycle of restaurant user-role assignments
///
/// Each (restaurant, user) pair owns at most one row. Re-assigning reuses it.
pub struct AssignmentStore {
    db: DatabaseConnection,
}

impl AssignmentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Assign `user_id` to a live restaurant
    ///
    /// Reactivates and updates the existing row for the pair if there is one,
    /// including rows that were deactivated or soft-deleted.
    ///
    /// # Arguments
    /// * `ctx` - Request context; its principal is recorded as `assigned_by`
    /// * `expires_at` - Optional Unix timestamp after which the assignment lapses
    ///
    /// # Errors
    /// * `AssignmentError::RestaurantNotFound` - Restaurant missing or soft-deleted
    pub async fn assign(
        &self,
        ctx: &RequestContext,
        restaurant_id: i64,
        user_id: i64,
        role: AssignmentRole,
        expires_at: Option<i64>,
    ) -> Result<restaurant_user_role::Model, InternalError> {
        let restaurant = restaurant::Entity::find_by_id(restaurant_id)
            .filter(restaurant::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_restaurant_for_assignment", e))?;

        if restaurant.is_none() {
            return Err(AssignmentError::RestaurantNotFound { restaurant_id }.into());
        }

        let now = Utc::now().timestamp();
        let existing = self.find_pair(restaurant_id, user_id).await?;

        let saved = match existing {
            Some(row) => {
                let mut active: restaurant_user_role::ActiveModel = row.into();
                active.role = Set(role);
                active.is_active = Set(true);
                active.expires_at = Set(expires_at);
                active.assigned_by = Set(ctx.actor_principal_id());
                active.deleted_at = Set(None);
                active.updated_at = Set(now);
                active
                    .update(&self.db)
                    .await
                    .map_err(|e| InternalError::database("reactivate_assignment", e))?
            }
            None => restaurant_user_role::ActiveModel {
                restaurant_id: Set(restaurant_id),
                user_id: Set(user_id),
                role: Set(role),
                is_active: Set(true),
                expires_at: Set(expires_at),
                assigned_by: Set(ctx.actor_principal_id()),
                created_at: Set(now),
                updated_at: Set(now),
                deleted_at: Set(None),
                ..Default::default()
            }
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("create_assignment", e))?,
        };

        audit::log_assignment_change(ctx, EventType::AssignmentCreated, &saved);

        Ok(saved)
    }

    /// Turn off an assignment without deleting it
    ///
    /// # Errors
    /// * `AssignmentError::AssignmentNotFound` - No live row for the pair
    pub async fn deactivate(
        &self,
        ctx: &RequestContext,
        restaurant_id: i64,
        user_id: i64,
    ) -> Result<restaurant_user_role::Model, InternalError> {
        let row = self.require(restaurant_id, user_id).await?;

        let mut active: restaurant_user_role::ActiveModel = row.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().timestamp());
        let updated = active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("deactivate_assignment", e))?;

        audit::log_assignment_change(ctx, EventType::AssignmentDeactivated, &updated);

        Ok(updated)
    }

    /// Soft-delete an assignment
    ///
    /// # Errors
    /// * `AssignmentError::AssignmentNotFound` - No live row for the pair
    pub async fn remove(
        &self,
        ctx: &RequestContext,
        restaurant_id: i64,
        user_id: i64,
    ) -> Result<(), InternalError> {
        let row = self.require(restaurant_id, user_id).await?;

        let now = Utc::now().timestamp();
        let mut active: restaurant_user_role::ActiveModel = row.into();
        active.is_active = Set(false);
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        let removed = active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("remove_assignment", e))?;

        audit::log_assignment_change(ctx, EventType::AssignmentRemoved, &removed);

        Ok(())
    }

    /// The live (not soft-deleted) row for the pair, active or not
    pub async fn find(
        &self,
        restaurant_id: i64,
        user_id: i64,
    ) -> Result<Option<restaurant_user_role::Model>, InternalError> {
        restaurant_user_role::Entity::find()
            .filter(restaurant_user_role::Column::RestaurantId.eq(restaurant_id))
            .filter(restaurant_user_role::Column::UserId.eq(user_id))
            .filter(restaurant_user_role::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_assignment", e))
    }

    /// Live assignment rows of a restaurant, ordered by id
    pub async fn list_for_restaurant(
        &self,
        restaurant_id: i64,
    ) -> Result<Vec<restaurant_user_role::Model>, InternalError> {
        restaurant_user_role::Entity::find()
            .filter(restaurant_user_role::Column::RestaurantId.eq(restaurant_id))
            .filter(restaurant_user_role::Column::DeletedAt.is_null())
            .order_by_asc(restaurant_user_role::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_assignments", e))
    }

    async fn find_pair(
        &self,
        restaurant_id: i64,
        user_id: i64,
    ) -> Result<Option<restaurant_user_role::Model>, InternalError> {
        restaurant_user_role::Entity::find()
            .filter(restaurant_user_role::Column::RestaurantId.eq(restaurant_id))
            .filter(restaurant_user_role::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_assignment_pair", e))
    }

    async fn require(
        &self,
        restaurant_id: i64,
        user_id: i64,
    ) -> Result<restaurant_user_role::Model, InternalError> {
        self.find(restaurant_id, user_id)
            .await?
            .ok_or_else(|| AssignmentError::AssignmentNotFound { restaurant_id, user_id }.into())
    }
}

impl fmt::Debug for AssignmentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssignmentStore")
            .field("db", &"<connection>")
            .finish()
    }
}
