use crate::providers::TokenProvider;
use crate::types::internal::PrincipalRole;

/// Print a bearer token for `user_id` holding `roles`
///
/// Unknown role names are rejected rather than silently dropped.
pub fn issue_token(
    token_provider: &TokenProvider,
    user_id: i64,
    roles: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let roles = roles
        .iter()
        .map(|role| role.parse::<PrincipalRole>())
        .collect::<Result<Vec<_>, _>>()?;

    let (token, jti) = token_provider.generate_jwt(user_id, &roles)?;

    tracing::info!("Issued token {} for principal {} from CLI", jti, user_id);
    println!("{}", token);

    Ok(())
}
