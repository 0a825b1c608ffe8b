pub mod app;
pub mod auth;
pub mod categories;
pub mod users;

use crate::flash::{Flash, Toast};
use tower_sessions::Session;

/// Session key holding the signed-in actor's display name.
pub const USER_NAME_KEY: &str = "user_name";

/// Flashed for any store failure; the UI does not tell failures apart.
pub const GENERIC_FAILURE: &str = "Terjadi kesalahan, silakan coba lagi";

/// Layout data shared by every page: who is signed in and the toasts to show.
#[derive(Debug, Clone, Default)]
pub struct Chrome {
    pub user_name: String,
    pub toasts: Vec<Toast>,
}

impl Chrome {
    /// Consumes the pending flash; call once per rendered page.
    pub async fn load(session: &Session) -> Self {
        let user_name = session
            .get::<String>(USER_NAME_KEY)
            .await
            .ok()
            .flatten()
            .unwrap_or_default();

        Self {
            user_name,
            toasts: Flash::take(session).await.toasts(),
        }
    }

    pub fn signed_in(&self) -> bool {
        !self.user_name.is_empty()
    }
}
