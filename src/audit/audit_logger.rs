use crate::types::db::restaurant_user_role;
use crate::types::internal::audit::{AuditEvent, EventType};
use crate::types::internal::context::RequestContext;

/// `tracing` target for audit records, so subscribers can route them separately
pub const AUDIT_TARGET: &str = "audit";

/// Emit an audit record on the audit target
pub fn log_event(event: &AuditEvent) {
    let data = serde_json::to_string(&event.data).unwrap_or_else(|_| "{}".to_string());

    tracing::info!(
        target: AUDIT_TARGET,
        event_type = %event.event_type,
        actor = %event.actor_id,
        principal_id = ?event.principal_id,
        ip_address = event.ip_address.as_deref().unwrap_or("unknown"),
        request_id = %event.request_id,
        source = ?event.source,
        data = %data,
        "audit"
    );
}

/// Record a change to a restaurant assignment
///
/// # Arguments
/// * `ctx` - Context of the actor making the change
/// * `event_type` - Which change happened
/// * `assignment` - Row as it stands after the change
pub fn log_assignment_change(
    ctx: &RequestContext,
    event_type: EventType,
    assignment: &restaurant_user_role::Model,
) -> AuditEvent {
    let event = assignment_event(ctx, event_type, assignment);
    log_event(&event);
    event
}

fn assignment_event(
    ctx: &RequestContext,
    event_type: EventType,
    assignment: &restaurant_user_role::Model,
) -> AuditEvent {
    AuditEvent::from_context(event_type, ctx)
        .with_field("assignment_id", assignment.id)
        .with_field("restaurant_id", assignment.restaurant_id)
        .with_field("user_id", assignment.user_id)
        .with_field("role", assignment.role.as_str())
        .with_field("is_active", assignment.is_active)
        .with_field("expires_at", assignment.expires_at)
}
