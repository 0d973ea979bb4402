// Audit trail for privileged changes
pub mod audit_logger;

pub use audit_logger::{AUDIT_TARGET, log_assignment_change, log_event};
