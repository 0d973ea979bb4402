use std::sync::Arc;

use crate::errors::InternalError;
use crate::stores::RestaurantStore;
use crate::types::internal::{AccessDecision, AccessTier, Principal, RestaurantRef, UnscopedPolicy};

/// Decides whether a principal may act on a restaurant
///
/// Decisions per tier:
/// * Global (admin, city-admin): always allowed, the restaurant is not looked up
/// * RestaurantManager: allowed without a restaurant; otherwise the restaurant
///   must exist and the principal needs an active assignment to it
/// * Unscoped: the configured policy applies without a restaurant; a named
///   restaurant is never accessible
pub struct AccessProvider {
    restaurant_store: Arc<RestaurantStore>,
    unscoped_policy: UnscopedPolicy,
}

impl AccessProvider {
    pub fn new(restaurant_store: Arc<RestaurantStore>, unscoped_policy: UnscopedPolicy) -> Self {
        Self {
            restaurant_store,
            unscoped_policy,
        }
    }

    /// Resolve access for `principal` to the restaurant named by `restaurant`
    ///
    /// # Returns
    /// * `Ok(AccessDecision)` - Terminal decision; denial is not an error
    /// * `Err(InternalError)` - Store lookup failed
    pub async fn resolve(
        &self,
        principal: Option<&Principal>,
        restaurant: Option<&RestaurantRef>,
    ) -> Result<AccessDecision, InternalError> {
        let Some(principal) = principal else {
            tracing::debug!(restaurant = ?restaurant, "Access unauthenticated: no principal");
            return Ok(AccessDecision::Unauthenticated);
        };

        let tier = principal.tier();
        let decision = match (tier, restaurant) {
            (AccessTier::Global, _) => AccessDecision::Allow,
            (AccessTier::RestaurantManager, None) => AccessDecision::Allow,
            (AccessTier::Unscoped, None) => self.unscoped_policy.decision(),
            (AccessTier::RestaurantManager, Some(reference)) => {
                match self.live_restaurant_id(reference).await? {
                    None => AccessDecision::NotFound,
                    Some(restaurant_id) => {
                        if self
                            .restaurant_store
                            .has_active_assignment(restaurant_id, principal.id())
                            .await?
                        {
                            AccessDecision::Allow
                        } else {
                            AccessDecision::Deny
                        }
                    }
                }
            }
            (AccessTier::Unscoped, Some(reference)) => {
                match self.live_restaurant_id(reference).await? {
                    None => AccessDecision::NotFound,
                    Some(_) => AccessDecision::Deny,
                }
            }
        };

        tracing::debug!(
            principal = principal.id(),
            tier = ?tier,
            restaurant = ?restaurant,
            %decision,
            "Access resolved"
        );

        Ok(decision)
    }

    async fn live_restaurant_id(&self, reference: &RestaurantRef) -> Result<Option<i64>, InternalError> {
        let Some(id) = reference.id() else {
            return Ok(None);
        };
        Ok(self.restaurant_store.find_by_id(id).await?.map(|restaurant| restaurant.id))
    }
}
