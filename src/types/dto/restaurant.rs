use poem_openapi::Object;
use serde::Serialize;

use crate::types::db::restaurant;

/// Restaurant as seen by API clients
#[derive(Object, Serialize, Debug, Clone, PartialEq)]
pub struct RestaurantResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,

    /// One of active, inactive, suspended
    pub status: String,

    pub created_at: i64,
    pub updated_at: i64,
}

impl From<restaurant::Model> for RestaurantResponse {
    fn from(model: restaurant::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            status: model.status.to_string(),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
