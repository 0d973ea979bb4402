// Stores layer - Data access and repository pattern
pub mod assignment_store;
pub mod product_store;
pub mod restaurant_store;

pub use assignment_store::AssignmentStore;
pub use product_store::ProductStore;
pub use restaurant_store::RestaurantStore;
