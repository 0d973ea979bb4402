use poem_openapi::{auth::Bearer, payload::Json, OpenApi, SecurityScheme, Tags};
use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::ApiError;
use crate::types::dto::restaurant::RestaurantResponse;
use crate::types::internal::Principal;

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(Bearer);

/// API tags for restaurant endpoints
#[derive(Tags)]
enum RestaurantTags {
    /// Restaurants visible to the caller
    Restaurants,
}

/// Restaurant listing endpoints, narrowed to the caller's scope
pub struct RestaurantApi {
    app_data: Arc<AppData>,
}

impl RestaurantApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self { app_data }
    }

    fn principal(&self, auth: &BearerAuth) -> Result<Principal, ApiError> {
        self.app_data
            .token_provider
            .principal_from_token(&auth.0.token)
            .map_err(|_| ApiError::unauthenticated())
    }
}

#[OpenApi]
impl RestaurantApi {
    /// List the restaurants the caller may access
    ///
    /// Admins and city admins see every restaurant, restaurant managers see
    /// their assigned restaurant, everyone else sees none.
    #[oai(path = "/restaurants", method = "get", tag = "RestaurantTags::Restaurants")]
    async fn list_restaurants(&self, auth: BearerAuth) -> Result<Json<Vec<RestaurantResponse>>, ApiError> {
        let principal = self.principal(&auth)?;

        let restaurants = self
            .app_data
            .scope_provider
            .get_accessible_restaurants(Some(&principal))
            .await?;

        Ok(Json(restaurants.into_iter().map(RestaurantResponse::from).collect()))
    }

    /// The restaurant the calling manager is assigned to
    #[oai(path = "/me/restaurant", method = "get", tag = "RestaurantTags::Restaurants")]
    async fn my_restaurant(&self, auth: BearerAuth) -> Result<Json<RestaurantResponse>, ApiError> {
        let principal = self.principal(&auth)?;

        self.app_data
            .scope_provider
            .get_assigned_restaurant(Some(&principal))
            .await?
            .map(|restaurant| Json(restaurant.into()))
            .ok_or_else(ApiError::no_assigned_restaurant)
    }
}
