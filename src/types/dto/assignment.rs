use serde::{Deserialize, Serialize};

use crate::types::db::restaurant_user_role;

/// Request body for assigning a user to a restaurant
#[derive(Deserialize, Debug)]
pub struct AssignUserRequest {
    pub user_id: i64,

    /// super_admin, restaurant_admin, restaurant_manager or staff
    #[serde(default = "default_role")]
    pub role: String,

    /// Optional Unix timestamp after which the assignment stops granting access
    #[serde(default)]
    pub expires_at: Option<i64>,
}

fn default_role() -> String {
    "restaurant_manager".to_string()
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AssignmentResponse {
    pub id: i64,
    pub restaurant_id: i64,
    pub user_id: i64,
    pub role: String,
    pub is_active: bool,
    pub expires_at: Option<i64>,
    pub assigned_by: Option<i64>,
}

impl From<restaurant_user_role::Model> for AssignmentResponse {
    fn from(model: restaurant_user_role::Model) -> Self {
        Self {
            id: model.id,
            restaurant_id: model.restaurant_id,
            user_id: model.user_id,
            role: model.role.to_string(),
            is_active: model.is_active,
            expires_at: model.expires_at,
            assigned_by: model.assigned_by,
        }
    }
}
