use thiserror::Error;

pub mod assignment;
pub mod database;
pub mod jwt_validation;

pub use assignment::AssignmentError;
pub use database::DatabaseError;
pub use jwt_validation::{JwtFailClass, JwtValidationError};

/// Internal error type for store and provider operations
///
/// Infrastructure errors (Database, Parse, Crypto) are shared; domain errors
/// belong to one store or provider. Not exposed via API - handlers convert
/// through `ApiError::from_internal_error`.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: String,
        message: String,
    },

    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    #[error(transparent)]
    JwtValidation(#[from] JwtValidationError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> InternalError {
        InternalError::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: impl Into<String>, message: impl Into<String>) -> InternalError {
        InternalError::Crypto {
            operation: operation.into(),
            message: message.into(),
        }
    }
}
