use std::fmt;
use std::sync::Arc;

use crate::config::errors::ApplicationError;
use crate::config::{EnvironmentProvider, SystemEnvironment};
use crate::types::internal::UnscopedPolicy;

const DEFAULT_DATABASE_URL: &str = "sqlite://restaurants.db?mode=rwc";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_JWT_EXPIRATION_MINUTES: i64 = 15;
/// One year
const MAX_JWT_EXPIRATION_MINUTES: i64 = 525_600;

/// Bootstrap settings for infrastructure configuration
pub struct BootstrapSettings {
    database_url: String,
    server_host: String,
    server_port: u16,
    login_url: Option<String>,
    unscoped_policy: UnscopedPolicy,
    jwt_expiration_minutes: i64,
}

impl BootstrapSettings {
    /// Load bootstrap settings from the given environment
    ///
    /// Unset variables fall back to defaults; set-but-invalid values are errors.
    pub fn from_env_provider(
        env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    ) -> Result<Self, ApplicationError> {
        let database_url = match env_provider.get_var("DATABASE_URL") {
            Some(value) if value.trim().is_empty() => {
                return Err(ApplicationError::invalid(
                    "DATABASE_URL",
                    "must be at least 1 characters long",
                ));
            }
            Some(value) => value.trim().to_string(),
            None => DEFAULT_DATABASE_URL.to_string(),
        };

        let server_host = match env_provider.get_var("HOST") {
            Some(value) => Self::validate_host_address(&value)?,
            None => DEFAULT_HOST.to_string(),
        };

        let server_port = match env_provider.get_var("PORT") {
            Some(value) => Self::parse_port(&value)?,
            None => DEFAULT_PORT,
        };

        let login_url = env_provider.get_non_empty("LOGIN_URL");

        let unscoped_policy = match env_provider.get_non_empty("UNSCOPED_POLICY") {
            Some(value) => value
                .parse::<UnscopedPolicy>()
                .map_err(|e| ApplicationError::parse("UNSCOPED_POLICY", e))?,
            None => UnscopedPolicy::default(),
        };

        let jwt_expiration_minutes = match env_provider.get_non_empty("JWT_EXPIRATION_MINUTES") {
            Some(value) => {
                let minutes = value
                    .parse::<i64>()
                    .map_err(|e| ApplicationError::parse("JWT_EXPIRATION_MINUTES", e.to_string()))?;
                if !(1..=MAX_JWT_EXPIRATION_MINUTES).contains(&minutes) {
                    return Err(ApplicationError::invalid(
                        "JWT_EXPIRATION_MINUTES",
                        format!("must be between 1 and {} minutes", MAX_JWT_EXPIRATION_MINUTES),
                    ));
                }
                minutes
            }
            None => DEFAULT_JWT_EXPIRATION_MINUTES,
        };

        Ok(Self {
            database_url,
            server_host,
            server_port,
            login_url,
            unscoped_policy,
            jwt_expiration_minutes,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ApplicationError> {
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    fn validate_host_address(value: &str) -> Result<String, ApplicationError> {
        let host = value.trim();
        if host.is_empty() {
            return Err(ApplicationError::invalid("HOST", "Host address cannot be empty"));
        }
        if host.contains(char::is_whitespace) {
            return Err(ApplicationError::invalid("HOST", "Host address cannot contain whitespace"));
        }
        Ok(host.to_string())
    }

    fn parse_port(value: &str) -> Result<u16, ApplicationError> {
        let port = value
            .trim()
            .parse::<u16>()
            .map_err(|e| ApplicationError::parse("PORT", format!("{}: {}", value, e)))?;
        if port == 0 {
            return Err(ApplicationError::invalid("PORT", "Port must be between 1 and 65535"));
        }
        Ok(port)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Where unauthenticated gated requests are redirected, if anywhere
    pub fn login_url(&self) -> Option<&str> {
        self.login_url.as_deref()
    }

    pub fn unscoped_policy(&self) -> UnscopedPolicy {
        self.unscoped_policy
    }

    pub fn jwt_expiration_minutes(&self) -> i64 {
        self.jwt_expiration_minutes
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("login_url", &self.login_url)
            .field("unscoped_policy", &self.unscoped_policy)
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .finish()
    }
}
