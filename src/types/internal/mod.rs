pub mod access;
pub mod audit;
pub mod auth;
pub mod context;
pub mod principal;

pub use access::{AccessDecision, RestaurantRef, UnscopedPolicy};
pub use principal::{AccessTier, Principal, PrincipalRole};
