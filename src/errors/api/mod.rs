// API-facing error types
pub mod access;

pub use access::{ApiError, ApiErrorResponse};
