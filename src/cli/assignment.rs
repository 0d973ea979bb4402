// Assignment management from the command line
// Changes made here carry a CLI actor and no `assigned_by` principal

use crate::errors::internal::AssignmentError;
use crate::stores::AssignmentStore;
use crate::types::db::restaurant_user_role::AssignmentRole;
use crate::types::internal::context::RequestContext;

/// Assign a user to a restaurant
///
/// # Arguments
/// * `role` - Assignment role name; both `restaurant_manager` and `restaurant-manager` work
/// * `expires_at` - Optional Unix timestamp after which access lapses
pub async fn assign(
    assignment_store: &AssignmentStore,
    restaurant_id: i64,
    user_id: i64,
    role: &str,
    expires_at: Option<i64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("assign");
    let role = role
        .parse::<AssignmentRole>()
        .map_err(|_| AssignmentError::UnknownRole { role: role.to_string() })?;

    let assignment = assignment_store
        .assign(&ctx, restaurant_id, user_id, role, expires_at)
        .await?;

    println!(
        "✅ User {} assigned to restaurant {} as {} (assignment {})",
        assignment.user_id, assignment.restaurant_id, assignment.role, assignment.id
    );

    Ok(())
}

/// Deactivate, or with `remove` soft-delete, a user's assignment
pub async fn unassign(
    assignment_store: &AssignmentStore,
    restaurant_id: i64,
    user_id: i64,
    remove: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("unassign");

    if remove {
        assignment_store.remove(&ctx, restaurant_id, user_id).await?;
        println!("✅ Assignment of user {} to restaurant {} removed", user_id, restaurant_id);
    } else {
        assignment_store.deactivate(&ctx, restaurant_id, user_id).await?;
        println!("✅ Assignment of user {} to restaurant {} deactivated", user_id, restaurant_id);
    }

    Ok(())
}
