use std::collections::HashMap;
use std::fmt;

use crate::types::internal::context::{RequestContext, RequestSource};

/// Privileged changes that leave an audit record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    AssignmentCreated,
    AssignmentDeactivated,
    AssignmentRemoved,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AssignmentCreated => "assignment_created",
            Self::AssignmentDeactivated => "assignment_deactivated",
            Self::AssignmentRemoved => "assignment_removed",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit record: who did what, from where, plus event-specific data
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEvent {
    pub event_type: EventType,
    pub actor_id: String,
    pub principal_id: Option<i64>,
    pub ip_address: Option<String>,
    pub request_id: String,
    pub source: RequestSource,
    pub data: HashMap<String, serde_json::Value>,
}

impl AuditEvent {
    /// Start an event carrying the actor details of `ctx`
    pub fn from_context(event_type: EventType, ctx: &RequestContext) -> Self {
        Self {
            event_type,
            actor_id: ctx.actor_id.clone(),
            principal_id: ctx.actor_principal_id(),
            ip_address: ctx.ip_address.map(|ip| ip.to_string()),
            request_id: ctx.request_id.to_string(),
            source: ctx.source.clone(),
            data: HashMap::new(),
        }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }
}
