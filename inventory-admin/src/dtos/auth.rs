use crate::utils::Password;
use serde::Deserialize;
use std::fmt;
use validator::Validate;

/// Body of `POST /login`.
#[derive(Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email wajib diisi"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password wajib diisi"))]
    pub password: String,
}

impl LoginForm {
    /// Trims the email so a whitespace-only value counts as empty.
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self
    }

    pub fn password(&self) -> Password {
        Password::new(self.password.clone())
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
