use crate::errors::internal::{AssignmentError, InternalError};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error body for every endpoint
#[derive(Object, Debug, Clone, PartialEq)]
pub struct ApiErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// API error types
///
/// The restaurant gate and every handler surface failures through this
/// enum so clients always see the same JSON shape.
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Malformed request
    #[oai(status = 400)]
    BadRequest(Json<ApiErrorResponse>),

    /// No authenticated principal
    #[oai(status = 401)]
    Unauthenticated(Json<ApiErrorResponse>),

    /// Principal lacks access to the restaurant or operation
    #[oai(status = 403)]
    Forbidden(Json<ApiErrorResponse>),

    /// Restaurant or assignment does not exist
    #[oai(status = 404)]
    NotFound(Json<ApiErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ApiErrorResponse>),
}

fn body(error: &str, message: impl Into<String>, status_code: u16) -> Json<ApiErrorResponse> {
    Json(ApiErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code,
    })
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(body("bad_request", message, 400))
    }

    pub fn unauthenticated() -> Self {
        ApiError::Unauthenticated(body("unauthenticated", "Authentication required", 401))
    }

    /// Authenticated principal without an assignment for the requested restaurant
    pub fn restaurant_forbidden() -> Self {
        ApiError::Forbidden(body(
            "forbidden",
            "You do not have access to this restaurant",
            403,
        ))
    }

    /// Operation restricted to admin and city-admin principals
    pub fn global_role_required() -> Self {
        ApiError::Forbidden(body(
            "global_role_required",
            "Admin or city-admin role required",
            403,
        ))
    }

    pub fn restaurant_not_found() -> Self {
        ApiError::NotFound(body("restaurant_not_found", "Restaurant not found", 404))
    }

    pub fn assignment_not_found() -> Self {
        ApiError::NotFound(body("assignment_not_found", "Assignment not found", 404))
    }

    pub fn no_assigned_restaurant() -> Self {
        ApiError::NotFound(body(
            "no_assigned_restaurant",
            "No restaurant is assigned to you",
            404,
        ))
    }

    /// Always returns a generic message without exposing internal details
    fn internal_server_error() -> Self {
        ApiError::InternalError(body("internal_error", "An internal error occurred", 500))
    }

    /// Convert InternalError to ApiError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Assignment(AssignmentError::RestaurantNotFound { restaurant_id }) => {
                tracing::debug!("Restaurant {} not found", restaurant_id);
                Self::restaurant_not_found()
            }
            InternalError::Assignment(AssignmentError::AssignmentNotFound { .. }) => {
                tracing::debug!("{}", err);
                Self::assignment_not_found()
            }
            InternalError::Assignment(AssignmentError::UnknownRole { role }) => {
                Self::bad_request(format!("Unknown assignment role: {}", role))
            }
            InternalError::JwtValidation(jwt_err) => {
                tracing::debug!("Rejected bearer token: {:?}", jwt_err.class);
                Self::unauthenticated()
            }
            InternalError::Database(_) => {
                tracing::error!("Database failure: {}", err);
                Self::internal_server_error()
            }
            InternalError::Parse { value_type, .. } => {
                tracing::error!("Parse error for {}: {}", value_type, err);
                Self::internal_server_error()
            }
            InternalError::Crypto { operation, .. } => {
                tracing::error!("Crypto error in {}: {}", operation, err);
                Self::internal_server_error()
            }
        }
    }

    fn response(&self) -> &ApiErrorResponse {
        match self {
            ApiError::BadRequest(json)
            | ApiError::Unauthenticated(json)
            | ApiError::Forbidden(json)
            | ApiError::NotFound(json)
            | ApiError::InternalError(json) => &json.0,
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.response().message.clone()
    }

    pub fn error_code(&self) -> &str {
        &self.response().error
    }

    pub fn status_code(&self) -> u16 {
        self.response().status_code
    }
}

impl From<InternalError> for ApiError {
    fn from(err: InternalError) -> Self {
        ApiError::from_internal_error(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
