// API-facing request and response payloads
pub mod assignment;
pub mod common;
pub mod product;
pub mod restaurant;
