use poem_openapi::Object;
use serde::Serialize;

use crate::types::db::product;

#[derive(Object, Serialize, Debug, Clone, PartialEq)]
pub struct ProductResponse {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub price_cents: i64,
    pub is_available: bool,
}

impl From<product::Model> for ProductResponse {
    fn from(model: product::Model) -> Self {
        Self {
            id: model.id,
            restaurant_id: model.restaurant_id,
            name: model.name,
            price_cents: model.price_cents,
            is_available: model.is_available,
        }
    }
}
