use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::errors::InternalError;
use crate::types::internal::auth::Claims;

/// Role names a principal can hold
///
/// These come from the identity subsystem (JWT claims); anything outside this
/// set is ignored and grants nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrincipalRole {
    Admin,
    CityAdmin,
    RestaurantManager,
    Staff,
}

impl PrincipalRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalRole::Admin => "admin",
            PrincipalRole::CityAdmin => "city-admin",
            PrincipalRole::RestaurantManager => "restaurant-manager",
            PrincipalRole::Staff => "staff",
        }
    }
}

impl fmt::Display for PrincipalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for PrincipalRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "admin" => Ok(PrincipalRole::Admin),
            "city-admin" => Ok(PrincipalRole::CityAdmin),
            "restaurant-manager" => Ok(PrincipalRole::RestaurantManager),
            "staff" => Ok(PrincipalRole::Staff),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// How far a principal's reach extends across restaurants
///
/// Computed once from the role set; admin and city-admin win over
/// restaurant-manager when a principal holds both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTier {
    /// admin or city-admin: every restaurant
    Global,
    /// restaurant-manager: only restaurants with an active assignment
    RestaurantManager,
    /// Any other role set: no restaurant-scoped access
    Unscoped,
}

/// An authenticated actor making a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    id: i64,
    roles: BTreeSet<PrincipalRole>,
}

impl Principal {
    pub fn new(id: i64, roles: impl IntoIterator<Item = PrincipalRole>) -> Self {
        Self {
            id,
            roles: roles.into_iter().collect(),
        }
    }

    /// Build a principal from raw role names, dropping names that are not recognised
    pub fn from_role_names<I, S>(id: i64, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let roles = names.into_iter().filter_map(|name| {
            match name.as_ref().parse::<PrincipalRole>() {
                Ok(role) => Some(role),
                Err(unknown) => {
                    tracing::debug!("Ignoring role for principal {}: {}", id, unknown);
                    None
                }
            }
        });
        Self::new(id, roles)
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn roles(&self) -> impl Iterator<Item = PrincipalRole> + '_ {
        self.roles.iter().copied()
    }

    pub fn has_role(&self, role: PrincipalRole) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_any_role(&self, roles: &[PrincipalRole]) -> bool {
        roles.iter().any(|role| self.has_role(*role))
    }

    pub fn tier(&self) -> AccessTier {
        if self.has_any_role(&[PrincipalRole::Admin, PrincipalRole::CityAdmin]) {
            AccessTier::Global
        } else if self.has_role(PrincipalRole::RestaurantManager) {
            AccessTier::RestaurantManager
        } else {
            AccessTier::Unscoped
        }
    }
}

impl TryFrom<&Claims> for Principal {
    type Error = InternalError;

    fn try_from(claims: &Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|e| InternalError::parse("principal id", format!("{}: {}", claims.sub, e)))?;
        Ok(Principal::from_role_names(id, &claims.roles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names_round_trip_through_parse() {
        for role in [
            PrincipalRole::Admin,
            PrincipalRole::CityAdmin,
            PrincipalRole::RestaurantManager,
            PrincipalRole::Staff,
        ] {
            assert_eq!(role.as_str().parse::<PrincipalRole>(), Ok(role));
        }
    }

    #[test]
    fn test_unknown_role_names_are_dropped() {
        let principal = Principal::from_role_names(3, ["staff", "owner", "restaurant_manager"]);

        assert_eq!(principal.roles().collect::<Vec<_>>(), vec![PrincipalRole::Staff]);
    }

    #[test]
    fn test_global_roles_outrank_restaurant_manager() {
        let admin = Principal::new(1, [PrincipalRole::RestaurantManager, PrincipalRole::Admin]);
        let city_admin = Principal::new(2, [PrincipalRole::CityAdmin]);
        let manager = Principal::new(3, [PrincipalRole::RestaurantManager, PrincipalRole::Staff]);
        let staff = Principal::new(4, [PrincipalRole::Staff]);
        let nobody = Principal::new(5, []);

        assert_eq!(admin.tier(), AccessTier::Global);
        assert_eq!(city_admin.tier(), AccessTier::Global);
        assert_eq!(manager.tier(), AccessTier::RestaurantManager);
        assert_eq!(staff.tier(), AccessTier::Unscoped);
        assert_eq!(nobody.tier(), AccessTier::Unscoped);
    }

    #[test]
    fn test_principal_from_claims() {
        let claims = Claims {
            sub: "42".to_string(),
            exp: 0,
            iat: 0,
            jti: None,
            roles: vec!["restaurant-manager".to_string()],
        };

        let principal = Principal::try_from(&claims).unwrap();
        assert_eq!(principal.id(), 42);
        assert!(principal.has_role(PrincipalRole::RestaurantManager));
    }

    #[test]
    fn test_principal_from_claims_rejects_non_numeric_subject() {
        let claims = Claims {
            sub: "not-a-number".to_string(),
            exp: 0,
            iat: 0,
            jti: None,
            roles: vec![],
        };

        assert!(Principal::try_from(&claims).is_err());
    }
}
