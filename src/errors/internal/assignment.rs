use thiserror::Error;

/// Errors from managing restaurant user-role assignments
#[derive(Error, Debug)]
pub enum AssignmentError {
    #[error("Restaurant not found: {restaurant_id}")]
    RestaurantNotFound { restaurant_id: i64 },

    #[error("No assignment for user {user_id} on restaurant {restaurant_id}")]
    AssignmentNotFound { restaurant_id: i64, user_id: i64 },

    #[error("Unknown assignment role: {role}")]
    UnknownRole { role: String },
}
