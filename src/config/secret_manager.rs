use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{EnvironmentProvider, SystemEnvironment};

const JWT_SECRET: &str = "JWT_SECRET";
const JWT_SECRET_MIN_LENGTH: usize = 32;

/// Custom error type for secret-related failures
#[derive(Debug, Error, PartialEq)]
pub enum SecretError {
    #[error("Required secret '{secret_name}' is missing")]
    Missing { secret_name: String },

    #[error("Secret '{secret_name}' must be at least {expected} characters, got {actual}")]
    InvalidLength {
        secret_name: String,
        expected: usize,
        actual: usize,
    },
}

/// Centralized manager for application secrets
pub struct SecretManager {
    jwt_secret: String,
}

impl SecretManager {
    /// Load and validate all secrets from the process environment
    ///
    /// # Errors
    /// Returns `SecretError` if any required secret is missing or fails validation
    pub fn init() -> Result<Self, SecretError> {
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    pub fn from_env_provider(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<Self, SecretError> {
        let jwt_secret = env_provider
            .get_var(JWT_SECRET)
            .ok_or_else(|| SecretError::Missing {
                secret_name: JWT_SECRET.to_string(),
            })?;
        Self::new(jwt_secret)
    }

    /// Build a manager from an already-known JWT secret, applying the same validation
    pub fn new(jwt_secret: impl Into<String>) -> Result<Self, SecretError> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.len() < JWT_SECRET_MIN_LENGTH {
            return Err(SecretError::InvalidLength {
                secret_name: JWT_SECRET.to_string(),
                expected: JWT_SECRET_MIN_LENGTH,
                actual: jwt_secret.len(),
            });
        }
        Ok(Self { jwt_secret })
    }

    /// Get the JWT secret
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretManager {{ secrets_loaded: 1 }}")
    }
}
