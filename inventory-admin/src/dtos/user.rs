use super::invalid;
use crate::models::Role;
use crate::utils::Password;
use serde::Deserialize;
use std::fmt;
use validator::{Validate, ValidationError};

/// Body of `POST /users`.
#[derive(Clone, Deserialize, Validate)]
pub struct CreateUserForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email wajib diisi"))]
    pub user_email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password wajib diisi"))]
    pub user_pass: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Nama lengkap wajib diisi"))]
    pub user_fullname: String,

    #[serde(default = "default_role")]
    #[validate(custom(function = "validate_form_role"))]
    pub user_role: String,
}

fn default_role() -> String {
    Role::FORM_DEFAULT.as_str().to_string()
}

fn validate_form_role(role: &str) -> Result<(), ValidationError> {
    match role.parse::<Role>() {
        Ok(role) if role.is_form_assignable() => Ok(()),
        _ => Err(invalid("role", "Role tidak valid")),
    }
}

impl CreateUserForm {
    /// Trims the identity fields so whitespace-only values count as empty.
    pub fn normalized(mut self) -> Self {
        self.user_email = self.user_email.trim().to_string();
        self.user_fullname = self.user_fullname.trim().to_string();
        self
    }

    /// Parsed role. Only meaningful after `validate()` succeeded.
    pub fn role(&self) -> Option<Role> {
        self.user_role.parse().ok()
    }

    pub fn password(&self) -> Password {
        Password::new(self.user_pass.clone())
    }
}

impl fmt::Debug for CreateUserForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserForm")
            .field("user_email", &self.user_email)
            .field("user_pass", &"[REDACTED]")
            .field("user_fullname", &self.user_fullname)
            .field("user_role", &self.user_role)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(role: &str) -> CreateUserForm {
        CreateUserForm {
            user_email: "budi@sekolah.id".to_string(),
            user_pass: "rahasia".to_string(),
            user_fullname: "Budi Santoso".to_string(),
            user_role: role.to_string(),
        }
    }

    #[test]
    fn staff_and_teacher_are_accepted() {
        assert!(form("petugas").validate().is_ok());
        assert!(form("guru").validate().is_ok());
    }

    #[test]
    fn admin_is_rejected() {
        let errors = form("admin").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("user_role"));
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(form("kepala").validate().is_err());
    }

    #[test]
    fn every_field_is_required() {
        let form: CreateUserForm = serde_urlencoded::from_str("").unwrap();
        let errors = crate::dtos::FieldErrors::from(&form.validate().unwrap_err());

        assert_eq!(errors.get("user_email"), Some("Email wajib diisi"));
        assert_eq!(errors.get("user_pass"), Some("Password wajib diisi"));
        assert_eq!(errors.get("user_fullname"), Some("Nama lengkap wajib diisi"));
        assert_eq!(errors.get("user_role"), None);
    }

    #[test]
    fn whitespace_only_identity_is_rejected() {
        let form: CreateUserForm = serde_urlencoded::from_str(
            "user_email=+++&user_fullname=%09+&user_pass=x&user_role=guru",
        )
        .unwrap();
        let errors = crate::dtos::FieldErrors::from(&form.normalized().validate().unwrap_err());

        assert_eq!(errors.get("user_email"), Some("Email wajib diisi"));
        assert_eq!(errors.get("user_fullname"), Some("Nama lengkap wajib diisi"));
    }

    #[test]
    fn normalizing_trims_identity_fields() {
        let form = CreateUserForm {
            user_email: "  budi@sekolah.id ".to_string(),
            user_fullname: " Budi Santoso\n".to_string(),
            ..form("guru")
        }
        .normalized();

        assert_eq!(form.user_email, "budi@sekolah.id");
        assert_eq!(form.user_fullname, "Budi Santoso");
    }

    #[test]
    fn debug_output_hides_password() {
        assert!(!format!("{:?}", form("guru")).contains("rahasia"));
    }

    #[test]
    fn role_defaults_to_teacher_when_absent() {
        let form: CreateUserForm =
            serde_urlencoded::from_str("user_email=a&user_pass=b&user_fullname=c").unwrap();
        assert_eq!(form.role(), Some(Role::Teacher));
    }
}
