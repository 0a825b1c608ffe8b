//! One-shot flash messages carried in the session to the next rendered page.
//!
//! A mutation handler calls [`Flash::push`] before redirecting; the page that
//! renders next calls [`Flash::take`] exactly once, which removes the value
//! from the session, and hands [`Flash::toasts`] to the layout.

use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use tower_sessions::Session;

pub const FLASH_KEY: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashKind {
    Success,
    Warning,
    Error,
}

impl FlashKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// A transient notification rendered by the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: FlashKind,
    pub message: String,
}

impl Toast {
    pub fn css_class(&self) -> &'static str {
        match self.kind {
            FlashKind::Success => "toast toast-success",
            FlashKind::Warning => "toast toast-warning",
            FlashKind::Error => "toast toast-error",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Flash {
    pub fn is_empty(&self) -> bool {
        self.success.is_none() && self.warning.is_none() && self.error.is_none()
    }

    /// Sets the message of `kind`, replacing an earlier one of the same kind.
    pub fn set(&mut self, kind: FlashKind, message: impl Into<String>) {
        let slot = match kind {
            FlashKind::Success => &mut self.success,
            FlashKind::Warning => &mut self.warning,
            FlashKind::Error => &mut self.error,
        };
        *slot = Some(message.into());
    }

    /// Toasts in display order: success, warning, error.
    pub fn toasts(&self) -> Vec<Toast> {
        [
            (FlashKind::Success, &self.success),
            (FlashKind::Warning, &self.warning),
            (FlashKind::Error, &self.error),
        ]
        .into_iter()
        .filter_map(|(kind, message)| {
            message.as_ref().map(|m| Toast {
                kind,
                message: m.clone(),
            })
        })
        .collect()
    }

    /// Adds a message to the flash pending in `session`.
    pub async fn push(
        session: &Session,
        kind: FlashKind,
        message: impl Into<String>,
    ) -> Result<(), AppError> {
        let mut flash = session
            .get::<Flash>(FLASH_KEY)
            .await
            .ok()
            .flatten()
            .unwrap_or_default();
        flash.set(kind, message);

        session
            .insert(FLASH_KEY, &flash)
            .await
            .map_err(|e| AppError::SessionError(format!("Failed to store flash: {}", e)))
    }

    /// Removes and returns the pending flash. Unreadable values count as empty.
    pub async fn take(session: &Session) -> Flash {
        match session.remove::<Flash>(FLASH_KEY).await {
            Ok(flash) => flash.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable flash");
                Flash::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[test]
    fn toasts_follow_display_order() {
        let mut flash = Flash::default();
        flash.set(FlashKind::Error, "gagal");
        flash.set(FlashKind::Success, "berhasil");

        let toasts = flash.toasts();
        assert_eq!(toasts.len(), 2);
        assert_eq!(toasts[0].kind, FlashKind::Success);
        assert_eq!(toasts[1].message, "gagal");
    }

    #[test]
    fn empty_flash_has_no_toasts() {
        assert!(Flash::default().is_empty());
        assert!(Flash::default().toasts().is_empty());
    }

    #[tokio::test]
    async fn take_consumes_the_flash_once() {
        let session = session();
        Flash::push(&session, FlashKind::Success, "Kategori berhasil ditambahkan")
            .await
            .unwrap();

        let first = Flash::take(&session).await;
        assert_eq!(
            first.success.as_deref(),
            Some("Kategori berhasil ditambahkan")
        );

        let second = Flash::take(&session).await;
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn push_keeps_other_kinds() {
        let session = session();
        Flash::push(&session, FlashKind::Warning, "peringatan")
            .await
            .unwrap();
        Flash::push(&session, FlashKind::Error, "gagal").await.unwrap();
        Flash::push(&session, FlashKind::Error, "gagal lagi")
            .await
            .unwrap();

        let flash = Flash::take(&session).await;
        assert_eq!(flash.warning.as_deref(), Some("peringatan"));
        assert_eq!(flash.error.as_deref(), Some("gagal lagi"));
    }
}
