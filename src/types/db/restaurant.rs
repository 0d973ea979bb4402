use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "restaurants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub status: RestaurantStatus,

    /// Unix timestamp (seconds).
    pub created_at: i64,
    pub updated_at: i64,

    /// Soft-delete marker. Rows with a value here are treated as missing.
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum RestaurantStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "suspended")]
    Suspended,
}

impl RestaurantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestaurantStatus::Active => "active",
            RestaurantStatus::Inactive => "inactive",
            RestaurantStatus::Suspended => "suspended",
        }
    }
}

impl fmt::Display for RestaurantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RestaurantStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "active" => Ok(RestaurantStatus::Active),
            "inactive" => Ok(RestaurantStatus::Inactive),
            "suspended" => Ok(RestaurantStatus::Suspended),
            other => Err(format!("unknown restaurant status: {}", other)),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::restaurant_user_role::Entity")]
    RestaurantUserRole,
    #[sea_orm(has_many = "super::product::Entity")]
    Product,
}

impl Related<super::restaurant_user_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RestaurantUserRole.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
