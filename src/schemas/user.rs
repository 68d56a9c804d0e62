//! Staff schema - Roster entries and the acting identity

use serde::{Deserialize, Serialize};

/// Staff role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    Lawyer,
    Paralegal,
    Staff,
}

impl UserRole {
    /// Admins and Lawyers review work and manage tasks
    pub fn is_reviewer(self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Lawyer)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "Admin"),
            UserRole::Lawyer => write!(f, "Lawyer"),
            UserRole::Paralegal => write!(f, "Paralegal"),
            UserRole::Staff => write!(f, "Staff"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "lawyer" => Ok(UserRole::Lawyer),
            "paralegal" => Ok(UserRole::Paralegal),
            "staff" => Ok(UserRole::Staff),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// A member of the firm's staff roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffUser {
    pub user_id: String,

    #[serde(default)]
    pub user_name: String,

    pub user_role: UserRole,
}

impl StaffUser {
    pub fn new(user_id: impl Into<String>, user_name: impl Into<String>, role: UserRole) -> Self {
        StaffUser {
            user_id: user_id.into(),
            user_name: user_name.into(),
            user_role: role,
        }
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.user_role = role;
        self
    }
}

/// The authenticated staff member invoking an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Actor {
            user_id: user_id.into(),
            role,
        }
    }
}

impl From<&StaffUser> for Actor {
    fn from(user: &StaffUser) -> Self {
        Actor::new(user.user_id.clone(), user.user_role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"Admin\"");
        assert_eq!(serde_json::from_str::<UserRole>("\"Paralegal\"").unwrap(), UserRole::Paralegal);
    }

    #[test]
    fn test_role_from_str_is_case_insensitive() {
        assert_eq!("LAWYER".parse::<UserRole>().unwrap(), UserRole::Lawyer);
        assert!("partner".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_is_reviewer() {
        assert!(UserRole::Admin.is_reviewer());
        assert!(UserRole::Lawyer.is_reviewer());
        assert!(!UserRole::Paralegal.is_reviewer());
        assert!(!UserRole::Staff.is_reviewer());
    }

    #[test]
    fn test_actor_from_staff_user() {
        let user = StaffUser::new("u1", "Ana", UserRole::Staff);
        let actor = Actor::from(&user);
        assert_eq!(actor.user_id, "u1");
        assert_eq!(actor.role, UserRole::Staff);
    }
}
