use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JwtFailClass {
    /// Token is not structurally a JWT or cannot be decoded
    Malformed,

    /// Token is structurally valid but cryptographic verification failed
    Invalid,

    /// Token has expired
    Expired,

    /// Token verified but rejected by another claim check (nbf, aud, iss, ...)
    ClaimsRejected,

    /// Token uses a disallowed algorithm or key format
    Unsupported,

    /// Anything else raised while validating
    Internal,
}

#[derive(Debug, Error)]
#[error("JWT validation failed: {class:?}")]
pub struct JwtValidationError {
    pub class: JwtFailClass,

    #[source]
    pub source: Option<jsonwebtoken::errors::Error>,
}

impl JwtValidationError {
    pub fn from_jsonwebtoken(err: jsonwebtoken::errors::Error) -> Self {
        Self {
            class: classify_jwt_error(&err),
            source: Some(err),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.class == JwtFailClass::Expired
    }
}

fn classify_jwt_error(err: &jsonwebtoken::errors::Error) -> JwtFailClass {
    use jsonwebtoken::errors::ErrorKind::*;

    match err.kind() {
        InvalidToken | Base64(_) | Json(_) | Utf8(_) => JwtFailClass::Malformed,
        InvalidSignature | InvalidAlgorithm => JwtFailClass::Invalid,
        ExpiredSignature => JwtFailClass::Expired,
        ImmatureSignature | InvalidAudience | InvalidIssuer | InvalidSubject
        | MissingRequiredClaim(_) => JwtFailClass::ClaimsRejected,
        MissingAlgorithm | InvalidAlgorithmName | InvalidKeyFormat => JwtFailClass::Unsupported,
        _ => JwtFailClass::Internal,
    }
}
