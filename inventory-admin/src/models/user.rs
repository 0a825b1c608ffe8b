//! Panel user model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Account role. Stored and submitted as `petugas`, `guru` or `admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "petugas")]
    Staff,
    #[serde(rename = "guru")]
    Teacher,
    #[serde(rename = "admin")]
    Admin,
}

impl Role {
    /// Order in which the user form lists the roles.
    pub const OPTIONS: [Role; 3] = [Role::Teacher, Role::Staff, Role::Admin];

    /// Bound value of a fresh user form.
    pub const FORM_DEFAULT: Role = Role::Teacher;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Staff => "petugas",
            Self::Teacher => "guru",
            Self::Admin => "admin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Staff => "Petugas",
            Self::Teacher => "Guru",
            Self::Admin => "Admin",
        }
    }

    /// Roles the user form accepts as a submitted value.
    pub fn is_form_assignable(&self) -> bool {
        matches!(self, Self::Staff | Self::Teacher)
    }

    /// Roles that receive the petugas session flag at login.
    pub fn has_panel_access(&self) -> bool {
        matches!(self, Self::Staff | Self::Admin)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "petugas" => Ok(Self::Staff),
            "guru" => Ok(Self::Teacher),
            "admin" => Ok(Self::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub role: String,
    pub created_utc: DateTime<Utc>,
}

impl User {
    pub fn parsed_role(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    pub fn role_label(&self) -> &str {
        self.parsed_role()
            .map(|r| r.label())
            .unwrap_or(self.role.as_str())
    }
}

/// Input for creating a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_wire_value() {
        for role in Role::OPTIONS {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn only_staff_and_teacher_are_form_assignable() {
        assert!(Role::Staff.is_form_assignable());
        assert!(Role::Teacher.is_form_assignable());
        assert!(!Role::Admin.is_form_assignable());
    }

    #[test]
    fn teachers_have_no_panel_access() {
        assert!(Role::Staff.has_panel_access());
        assert!(Role::Admin.has_panel_access());
        assert!(!Role::Teacher.has_panel_access());
    }

    #[test]
    fn form_defaults_to_teacher() {
        assert_eq!(Role::FORM_DEFAULT, Role::Teacher);
    }
}
