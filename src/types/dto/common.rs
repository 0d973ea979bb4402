use poem_openapi::Object;
use serde::Serialize;

/// Health check response
#[derive(Object, Serialize, Debug)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Current server time (RFC 3339)
    pub timestamp: String,
}
