//! Endpoints behind `RestaurantGate`
//!
//! These are plain poem handlers so the gate can see their path parameters.
//! Each one can rely on a `RequestContext` being present.

use poem::http::StatusCode;
use poem::web::{Data, Json, Path, Query};
use poem::handler;
use serde::Deserialize;
use std::sync::Arc;

use crate::app_data::AppData;
use crate::errors::internal::AssignmentError;
use crate::errors::{ApiError, InternalError};
use crate::types::db::restaurant;
use crate::types::db::restaurant_user_role::AssignmentRole;
use crate::types::dto::assignment::{AssignUserRequest, AssignmentResponse};
use crate::types::dto::product::ProductResponse;
use crate::types::dto::restaurant::RestaurantResponse;
use crate::types::internal::context::RequestContext;
use crate::types::internal::AccessTier;

#[derive(Deserialize, Debug, Default)]
pub struct ProductFilter {
    pub restaurant_id: Option<i64>,
}

/// Look up the restaurant named in the path
///
/// Global principals pass the gate for any identifier, so the lookup can
/// still miss here.
async fn load_restaurant(app_data: &AppData, raw_id: &str) -> Result<restaurant::Model, ApiError> {
    let Ok(id) = raw_id.trim().parse::<i64>() else {
        return Err(ApiError::restaurant_not_found());
    };
    app_data
        .restaurant_store
        .find_by_id(id)
        .await?
        .ok_or_else(ApiError::restaurant_not_found)
}

fn require_global(ctx: &RequestContext) -> Result<(), ApiError> {
    match ctx.principal().map(|principal| principal.tier()) {
        Some(AccessTier::Global) => Ok(()),
        _ => Err(ApiError::global_role_required()),
    }
}

#[handler]
pub async fn show_restaurant(
    Path(restaurant): Path<String>,
    Data(app_data): Data<&Arc<AppData>>,
) -> poem::Result<Json<RestaurantResponse>> {
    let restaurant = load_restaurant(app_data, &restaurant).await?;
    Ok(Json(restaurant.into()))
}

/// Products of the restaurant in the path; the gate has already checked access
#[handler]
pub async fn restaurant_products(
    Path(restaurant): Path<String>,
    Data(app_data): Data<&Arc<AppData>>,
) -> poem::Result<Json<Vec<ProductResponse>>> {
    let restaurant = load_restaurant(app_data, &restaurant).await?;

    let products = app_data
        .product_store
        .fetch(app_data.product_store.query_for_restaurant(Some(restaurant.id)))
        .await
        .map_err(ApiError::from_internal_error)?;

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// Products visible to the caller, optionally for one restaurant
#[handler]
pub async fn list_products(
    Query(filter): Query<ProductFilter>,
    Data(app_data): Data<&Arc<AppData>>,
    Data(ctx): Data<&RequestContext>,
) -> poem::Result<Json<Vec<ProductResponse>>> {
    let query = app_data.product_store.query_for_restaurant(filter.restaurant_id);
    let scoped = app_data
        .scope_provider
        .scope_query(ctx.principal(), query)
        .await
        .map_err(ApiError::from_internal_error)?;

    let products = app_data
        .product_store
        .fetch(scoped)
        .await
        .map_err(ApiError::from_internal_error)?;

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

#[handler]
pub async fn list_assignments(
    Path(restaurant): Path<String>,
    Data(app_data): Data<&Arc<AppData>>,
    Data(ctx): Data<&RequestContext>,
) -> poem::Result<Json<Vec<AssignmentResponse>>> {
    require_global(ctx)?;
    let restaurant = load_restaurant(app_data, &restaurant).await?;

    let assignments = app_data
        .assignment_store
        .list_for_restaurant(restaurant.id)
        .await
        .map_err(ApiError::from_internal_error)?;

    Ok(Json(assignments.into_iter().map(AssignmentResponse::from).collect()))
}

#[handler]
pub async fn assign_user(
    Path(restaurant): Path<String>,
    Json(body): Json<AssignUserRequest>,
    Data(app_data): Data<&Arc<AppData>>,
    Data(ctx): Data<&RequestContext>,
) -> poem::Result<(StatusCode, Json<AssignmentResponse>)> {
    require_global(ctx)?;
    let restaurant = load_restaurant(app_data, &restaurant).await?;

    let role = body.role.parse::<AssignmentRole>().map_err(|_| {
        ApiError::from_internal_error(InternalError::Assignment(AssignmentError::UnknownRole {
            role: body.role.clone(),
        }))
    })?;

    let assignment = app_data
        .assignment_store
        .assign(ctx, restaurant.id, body.user_id, role, body.expires_at)
        .await
        .map_err(ApiError::from_internal_error)?;

    Ok((StatusCode::CREATED, Json(assignment.into())))
}

#[handler]
pub async fn unassign_user(
    Path((restaurant, user_id)): Path<(String, i64)>,
    Data(app_data): Data<&Arc<AppData>>,
    Data(ctx): Data<&RequestContext>,
) -> poem::Result<StatusCode> {
    require_global(ctx)?;
    let restaurant = load_restaurant(app_data, &restaurant).await?;

    app_data
        .assignment_store
        .remove(ctx, restaurant.id, user_id)
        .await
        .map_err(ApiError::from_internal_error)?;

    Ok(StatusCode::NO_CONTENT)
}
