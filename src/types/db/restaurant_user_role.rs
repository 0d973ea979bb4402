use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use sea_orm::Condition;
use serde::{Deserialize, Serialize};

/// Assignment of a user to a restaurant (restaurant_user_roles).
///
/// At most one row exists per (restaurant_id, user_id); unassigning flips
/// `is_active` or sets `deleted_at` rather than inserting a new row.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "restaurant_user_roles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub restaurant_id: i64,
    pub user_id: i64,

    pub role: AssignmentRole,

    pub is_active: bool,

    /// Unix timestamp (seconds). An assignment past this point is inactive.
    pub expires_at: Option<i64>,

    /// Principal that created or last re-activated the assignment.
    pub assigned_by: Option<i64>,

    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

/// Filter matching only assignments that grant access at `now`
pub fn active_at(now: i64) -> Condition {
    Condition::all()
        .add(Column::IsActive.eq(true))
        .add(Column::DeletedAt.is_null())
        .add(
            Condition::any()
                .add(Column::ExpiresAt.is_null())
                .add(Column::ExpiresAt.gt(now)),
        )
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum AssignmentRole {
    #[sea_orm(string_value = "super_admin")]
    SuperAdmin,
    #[sea_orm(string_value = "restaurant_admin")]
    RestaurantAdmin,
    #[sea_orm(string_value = "restaurant_manager")]
    RestaurantManager,
    #[sea_orm(string_value = "staff")]
    Staff,
}

impl AssignmentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentRole::SuperAdmin => "super_admin",
            AssignmentRole::RestaurantAdmin => "restaurant_admin",
            AssignmentRole::RestaurantManager => "restaurant_manager",
            AssignmentRole::Staff => "staff",
        }
    }
}

impl fmt::Display for AssignmentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssignmentRole {
    type Err = String;

    /// Accepts both `restaurant_manager` and `restaurant-manager` spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('-', "_").as_str() {
            "super_admin" => Ok(AssignmentRole::SuperAdmin),
            "restaurant_admin" => Ok(AssignmentRole::RestaurantAdmin),
            "restaurant_manager" => Ok(AssignmentRole::RestaurantManager),
            "staff" => Ok(AssignmentRole::Staff),
            _ => Err(format!("unknown assignment role: {}", s)),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::restaurant::Entity",
        from = "Column::RestaurantId",
        to = "super::restaurant::Column::Id",
        on_delete = "Cascade"
    )]
    Restaurant,
}

impl Related<super::restaurant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
