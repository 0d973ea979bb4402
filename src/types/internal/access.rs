use std::fmt;
use std::str::FromStr;

/// Outcome of a restaurant-scoped access check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    /// Authenticated but lacking the required assignment (403)
    Deny,
    /// Restaurant identifier does not resolve to a live restaurant (404)
    NotFound,
    /// No principal on the request (401 / login redirect)
    Unauthenticated,
}

impl fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccessDecision::Allow => "allow",
            AccessDecision::Deny => "deny",
            AccessDecision::NotFound => "not_found",
            AccessDecision::Unauthenticated => "unauthenticated",
        };
        f.write_str(s)
    }
}

/// Candidate restaurant identifier as it arrived on a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestaurantRef {
    Id(i64),
    /// Present but not an id; can never match a row
    Unresolvable(String),
}

impl RestaurantRef {
    /// Parse a raw parameter value. Blank values count as absent.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        Some(match raw.parse::<i64>() {
            Ok(id) => RestaurantRef::Id(id),
            Err(_) => RestaurantRef::Unresolvable(raw.to_owned()),
        })
    }

    pub fn id(&self) -> Option<i64> {
        match self {
            RestaurantRef::Id(id) => Some(*id),
            RestaurantRef::Unresolvable(_) => None,
        }
    }
}

impl From<i64> for RestaurantRef {
    fn from(id: i64) -> Self {
        RestaurantRef::Id(id)
    }
}

/// Decision for principals without a restaurant-scoped role when the request
/// names no restaurant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnscopedPolicy {
    /// Let the request through; other layers decide
    #[default]
    PassThrough,
    Deny,
}

impl UnscopedPolicy {
    pub fn decision(&self) -> AccessDecision {
        match self {
            UnscopedPolicy::PassThrough => AccessDecision::Allow,
            UnscopedPolicy::Deny => AccessDecision::Deny,
        }
    }
}

impl FromStr for UnscopedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pass_through" | "pass-through" | "allow" => Ok(UnscopedPolicy::PassThrough),
            "deny" => Ok(UnscopedPolicy::Deny),
            other => Err(format!(
                "Expected 'pass_through' or 'deny', got '{}'",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric_reference() {
        assert_eq!(RestaurantRef::parse(" 7 "), Some(RestaurantRef::Id(7)));
    }

    #[test]
    fn test_parse_blank_reference_is_absent() {
        assert_eq!(RestaurantRef::parse(""), None);
        assert_eq!(RestaurantRef::parse("   "), None);
    }

    #[test]
    fn test_parse_slug_is_unresolvable() {
        let reference = RestaurantRef::parse("pizza-place").unwrap();
        assert_eq!(reference, RestaurantRef::Unresolvable("pizza-place".to_string()));
        assert_eq!(reference.id(), None);
    }

    #[test]
    fn test_unscoped_policy_parsing() {
        assert_eq!("pass_through".parse::<UnscopedPolicy>(), Ok(UnscopedPolicy::PassThrough));
        assert_eq!("DENY".parse::<UnscopedPolicy>(), Ok(UnscopedPolicy::Deny));
        assert!("sometimes".parse::<UnscopedPolicy>().is_err());
    }

    #[test]
    fn test_unscoped_policy_decisions() {
        assert_eq!(UnscopedPolicy::default().decision(), AccessDecision::Allow);
        assert_eq!(UnscopedPolicy::Deny.decision(), AccessDecision::Deny);
    }
}
