use crate::dtos::{CreateUserForm, FieldErrors};
use crate::models::{Role, User};
use serde::Deserialize;

/// `GET /users` query: `?create=1` opens the creation dialog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPageQuery {
    pub create: Option<String>,
}

impl UserPageQuery {
    pub fn dialog_open(&self) -> bool {
        matches!(self.create.as_deref(), Some(v) if !v.is_empty() && v != "0" && v != "false")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRowView {
    pub full_name: String,
    pub email: String,
    pub role_label: String,
}

impl From<&User> for UserRowView {
    fn from(user: &User) -> Self {
        Self {
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role_label: user.role_label().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// The user-creation dialog. The password is never carried back into the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFormState {
    pub open: bool,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub errors: FieldErrors,
}

impl UserFormState {
    pub fn closed() -> Self {
        Self {
            open: false,
            full_name: String::new(),
            email: String::new(),
            role: Role::FORM_DEFAULT.as_str().to_string(),
            errors: FieldErrors::new(),
        }
    }

    pub fn opened() -> Self {
        Self {
            open: true,
            ..Self::closed()
        }
    }

    pub fn rejected(form: &CreateUserForm, errors: FieldErrors) -> Self {
        Self {
            open: true,
            full_name: form.user_fullname.clone(),
            email: form.user_email.clone(),
            role: form.user_role.clone(),
            errors,
        }
    }

    pub fn role_options(&self) -> Vec<RoleOption> {
        Role::OPTIONS
            .iter()
            .map(|role| RoleOption {
                value: role.as_str(),
                label: role.label(),
                selected: role.as_str() == self.role,
            })
            .collect()
    }
}
