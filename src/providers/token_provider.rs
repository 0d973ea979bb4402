use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::SecretManager;
use crate::errors::InternalError;
use crate::errors::internal::JwtValidationError;
use crate::types::internal::auth::Claims;
use crate::types::internal::{Principal, PrincipalRole};

/// Issues and validates the HS256 access tokens that carry a principal
pub struct TokenProvider {
    secret_manager: Arc<SecretManager>,
    jwt_expiration_minutes: i64,
}

impl TokenProvider {
    pub fn new(secret_manager: Arc<SecretManager>, jwt_expiration_minutes: i64) -> Self {
        Self {
            secret_manager,
            jwt_expiration_minutes,
        }
    }

    /// Generate a JWT for the given principal id and roles
    ///
    /// # Returns
    /// * `Result<(String, String), InternalError>` - Tuple of (encoded JWT, JWT ID) or an error
    pub fn generate_jwt(
        &self,
        user_id: i64,
        roles: &[PrincipalRole],
    ) -> Result<(String, String), InternalError> {
        let now = Utc::now().timestamp();
        let expiration = self
            .jwt_expiration_minutes
            .checked_mul(60)
            .and_then(|seconds| now.checked_add(seconds))
            .filter(|expiration| DateTime::from_timestamp(*expiration, 0).is_some())
            .ok_or_else(|| {
                InternalError::parse(
                    "timestamp",
                    format!("Expiration of {} minutes is out of range", self.jwt_expiration_minutes),
                )
            })?;

        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id.to_string(),
            exp: expiration,
            iat: now,
            jti: Some(jti.clone()),
            roles: roles.iter().map(|role| role.as_str().to_string()).collect(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_generation", format!("Failed to generate JWT: {}", e)))?;

        tracing::debug!("Issued JWT {} for principal {}", jti, user_id);

        Ok((token, jti))
    }

    /// Validate a JWT and return the claims
    ///
    /// # Errors
    /// * `InternalError::JwtValidation` - Bad signature, malformed or expired token
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, InternalError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
            &validation,
        )
        .map(|token_data| token_data.claims)
        .map_err(|e| JwtValidationError::from_jsonwebtoken(e).into())
    }

    /// Validate a bearer token and turn its claims into a principal
    pub fn principal_from_token(&self, token: &str) -> Result<Principal, InternalError> {
        let claims = self.validate_jwt(token).inspect_err(|e| {
            tracing::debug!("Bearer token rejected: {}", e);
        })?;
        Principal::try_from(&claims)
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("secret_manager", &"<redacted>")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .finish()
    }
}

impl fmt::Display for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenProvider {{ jwt_expiration: {}min }}", self.jwt_expiration_minutes)
    }
}
