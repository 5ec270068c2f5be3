//! Portal user models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access roles for portal users
///
/// `Admin` manages customers, products and invoicing; `Team` handles stock
/// movements and sees their own delivery log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Team,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Team => "team",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "admin" => Some(Role::Admin),
            "team" => Some(Role::Team),
            _ => None,
        }
    }
}

/// Authenticated request context: who is acting and in what role
///
/// Always passed explicitly into services, never read from ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("team"), Some(Role::Team));
        assert_eq!(Role::parse("owner"), None);
        assert_eq!(Role::parse(Role::Team.as_str()), Some(Role::Team));
    }
}
