use std::net::IpAddr;

use poem::Request;
use poem_openapi::auth::{Bearer, BearerAuthorization};

use crate::providers::TokenProvider;
use crate::types::internal::principal::Principal;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Carries the principal explicitly so that access checks never reach for
/// process-wide authentication state.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Authenticated principal, if a valid bearer token was presented
    pub principal: Option<Principal>,

    /// Source of the request (API, CLI, or System)
    pub source: RequestSource,

    /// Actor who initiated the operation
    pub actor_id: String,
}

impl RequestContext {
    /// Create an unauthenticated API context with a fresh request id
    pub fn new() -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            principal: None,
            source: RequestSource::API,
            actor_id: "unknown".to_owned(),
        }
    }

    /// Create a RequestContext for CLI operations
    ///
    /// # Arguments
    /// * `command_name` - Name of the CLI command being executed
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            source: RequestSource::CLI,
            actor_id: format!("cli:{}", command_name),
            ..Self::new()
        }
    }

    /// Create a RequestContext for system operations
    pub fn for_system(operation_name: &str) -> Self {
        Self {
            source: RequestSource::System,
            actor_id: format!("system:{}", operation_name),
            ..Self::new()
        }
    }

    /// Build the context for an inbound HTTP request
    ///
    /// A missing, malformed or expired bearer token leaves the context
    /// unauthenticated; the token provider logs why.
    pub fn from_request(req: &Request, token_provider: &TokenProvider) -> Self {
        let mut ctx = Self::new();
        ctx.ip_address = Self::extract_ip_address(req);

        if let Some(bearer) = Self::extract_bearer(req) {
            if let Ok(principal) = token_provider.principal_from_token(&bearer.token) {
                ctx = ctx.with_principal(principal);
            }
        }

        tracing::trace!("Request context created: {:?}", ctx);
        ctx
    }

    fn extract_bearer(req: &Request) -> Option<Bearer> {
        Bearer::from_request(req).ok()
    }

    /// Extract IP address from request headers
    ///
    /// Checks X-Forwarded-For, X-Real-IP, and falls back to remote address.
    pub fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                return ip.trim().parse().ok();
            }
        }

        if let Some(real_ip) = req.header("X-Real-IP") {
            return real_ip.trim().parse().ok();
        }

        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }

    pub fn with_ip_address(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    /// Attach an authenticated principal; the actor becomes the principal id
    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.actor_id = principal.id().to_string();
        self.principal = Some(principal);
        self
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    /// Principal id of the actor, when the actor is a principal
    pub fn actor_principal_id(&self) -> Option<i64> {
        self.principal.as_ref().map(Principal::id)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
