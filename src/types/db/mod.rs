// Database entities - SeaORM models
pub mod product;
pub mod restaurant;
pub mod restaurant_user_role;

use sea_orm::EntityTrait;

/// Entities whose rows belong to exactly one restaurant
///
/// Used by the scope helper to narrow any listing query down to the
/// restaurant a principal is assigned to.
pub trait RestaurantScoped: EntityTrait {
    /// Column holding the owning restaurant's id
    fn restaurant_column() -> Self::Column;
}

impl RestaurantScoped for restaurant::Entity {
    fn restaurant_column() -> Self::Column {
        restaurant::Column::Id
    }
}

impl RestaurantScoped for restaurant_user_role::Entity {
    fn restaurant_column() -> Self::Column {
        restaurant_user_role::Column::RestaurantId
    }
}

impl RestaurantScoped for product::Entity {
    fn restaurant_column() -> Self::Column {
        product::Column::RestaurantId
    }
}
