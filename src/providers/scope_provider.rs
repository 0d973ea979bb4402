use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, QueryFilter, Select};
use std::sync::Arc;

use crate::errors::InternalError;
use crate::stores::RestaurantStore;
use crate::types::db::{restaurant, RestaurantScoped};
use crate::types::internal::{AccessTier, Principal};

/// Narrows listings to the restaurants a principal may see
pub struct ScopeProvider {
    restaurant_store: Arc<RestaurantStore>,
}

impl ScopeProvider {
    pub fn new(restaurant_store: Arc<RestaurantStore>) -> Self {
        Self { restaurant_store }
    }

    /// Restaurant of a restaurant-manager's earliest active assignment
    ///
    /// Always `None` for other principals, including admins.
    pub async fn get_assigned_restaurant(
        &self,
        principal: Option<&Principal>,
    ) -> Result<Option<restaurant::Model>, InternalError> {
        match principal {
            Some(principal) if principal.tier() == AccessTier::RestaurantManager => {
                self.restaurant_store.find_assigned_restaurant(principal.id()).await
            }
            _ => Ok(None),
        }
    }

    pub async fn get_assigned_restaurant_id(
        &self,
        principal: Option<&Principal>,
    ) -> Result<Option<i64>, InternalError> {
        Ok(self
            .get_assigned_restaurant(principal)
            .await?
            .map(|restaurant| restaurant.id))
    }

    /// Whether `principal` may operate on `restaurant`
    ///
    /// False when either side is absent or the restaurant is no longer live,
    /// even if the model in hand predates its soft deletion.
    pub async fn can_access_restaurant(
        &self,
        principal: Option<&Principal>,
        restaurant: Option<&restaurant::Model>,
    ) -> Result<bool, InternalError> {
        let (Some(principal), Some(restaurant)) = (principal, restaurant) else {
            return Ok(false);
        };
        if restaurant.deleted_at.is_some()
            || self.restaurant_store.find_by_id(restaurant.id).await?.is_none()
        {
            return Ok(false);
        }

        match principal.tier() {
            AccessTier::Global => Ok(true),
            AccessTier::RestaurantManager => {
                self.restaurant_store
                    .has_active_assignment(restaurant.id, principal.id())
                    .await
            }
            AccessTier::Unscoped => Ok(false),
        }
    }

    /// Restrict `query` to rows the principal may see
    ///
    /// Global principals get the query back untouched. A manager's query is
    /// limited to the assigned restaurant. Everyone else, and managers without
    /// an assignment, get a query that matches nothing.
    pub async fn scope_query<E>(
        &self,
        principal: Option<&Principal>,
        query: Select<E>,
    ) -> Result<Select<E>, InternalError>
    where
        E: RestaurantScoped,
    {
        let tier = principal.map(Principal::tier);
        if tier == Some(AccessTier::Global) {
            return Ok(query);
        }

        Ok(match self.get_assigned_restaurant_id(principal).await? {
            Some(restaurant_id) => query.filter(E::restaurant_column().eq(restaurant_id)),
            None => query.filter(Expr::cust("1 = 0")),
        })
    }

    /// Every restaurant the principal may see, ordered by id
    pub async fn get_accessible_restaurants(
        &self,
        principal: Option<&Principal>,
    ) -> Result<Vec<restaurant::Model>, InternalError> {
        let Some(principal) = principal else {
            return Ok(Vec::new());
        };

        match principal.tier() {
            AccessTier::Global => self.restaurant_store.list_all().await,
            AccessTier::RestaurantManager => Ok(self
                .get_assigned_restaurant(Some(principal))
                .await?
                .into_iter()
                .collect()),
            AccessTier::Unscoped => Ok(Vec::new()),
        }
    }
}
