//! Configuration module for inventory-admin.

use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
    pub session: SessionSettings,
    /// Directory served under `/static`.
    pub static_dir: String,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Sets the `Secure` attribute on the session cookie.
    pub secure_cookie: bool,
    pub inactivity_hours: i64,
}

impl SessionSettings {
    /// Upper bound for `SESSION_INACTIVITY_HOURS`; larger values overflow the cookie expiry.
    pub const MAX_INACTIVITY_HOURS: i64 = 24 * 365;

    /// Inactivity window clamped to `1..=MAX_INACTIVITY_HOURS`.
    pub fn inactivity(&self) -> time::Duration {
        time::Duration::hours(self.inactivity_hours.clamp(1, Self::MAX_INACTIVITY_HOURS))
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            secure_cookie: false,
            inactivity_hours: 24,
        }
    }
}

/// Administrator created on startup when the users table is empty.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: Secret<String>,
    pub full_name: String,
}

impl BootstrapAdmin {
    /// Both e-mail and password must be present and non-empty.
    pub fn from_parts(
        email: Option<String>,
        password: Option<String>,
        full_name: Option<String>,
    ) -> Option<Self> {
        let email = email.filter(|e| !e.trim().is_empty())?;
        let password = password.filter(|p| !p.is_empty())?;

        Some(Self {
            email: email.trim().to_string(),
            password: Secret::new(password),
            full_name: full_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "Administrator".to_string()),
        })
    }
}

impl AdminConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "inventory-admin".to_string()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| {
                    AppError::ConfigError(anyhow::anyhow!("DATABASE_URL is required"))
                })?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(2),
            },
            session: SessionSettings {
                secure_cookie: env::var("SESSION_SECURE_COOKIE")
                    .ok()
                    .and_then(|s| parse_flag(&s))
                    .unwrap_or(false),
                inactivity_hours: parse_inactivity_hours(
                    env::var("SESSION_INACTIVITY_HOURS").ok().as_deref(),
                ),
            },
            static_dir: env::var("STATIC_DIR")
                .unwrap_or_else(|_| "inventory-admin/static".to_string()),
            bootstrap_admin: BootstrapAdmin::from_parts(
                env::var("ADMIN_BOOTSTRAP_EMAIL").ok(),
                env::var("ADMIN_BOOTSTRAP_PASSWORD").ok(),
                env::var("ADMIN_BOOTSTRAP_NAME").ok(),
            ),
        })
    }
}

fn parse_inactivity_hours(value: Option<&str>) -> i64 {
    value
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|h| *h > 0)
        .map(|h| h.min(SessionSettings::MAX_INACTIVITY_HOURS))
        .unwrap_or(24)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" on "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn inactivity_hours_are_clamped() {
        assert_eq!(parse_inactivity_hours(None), 24);
        assert_eq!(parse_inactivity_hours(Some("8")), 8);
        assert_eq!(parse_inactivity_hours(Some("0")), 24);
        assert_eq!(parse_inactivity_hours(Some("-3")), 24);
        assert_eq!(parse_inactivity_hours(Some("soon")), 24);
        assert_eq!(
            parse_inactivity_hours(Some("9223372036854775807")),
            SessionSettings::MAX_INACTIVITY_HOURS
        );
    }

    #[test]
    fn session_inactivity_never_exceeds_the_maximum() {
        let settings = SessionSettings {
            secure_cookie: false,
            inactivity_hours: i64::MAX,
        };
        assert_eq!(settings.inactivity(), time::Duration::hours(24 * 365));

        let settings = SessionSettings {
            secure_cookie: false,
            inactivity_hours: 0,
        };
        assert_eq!(settings.inactivity(), time::Duration::hours(1));
    }

    #[test]
    fn bootstrap_admin_needs_email_and_password() {
        assert!(BootstrapAdmin::from_parts(None, Some("x".into()), None).is_none());
        assert!(BootstrapAdmin::from_parts(Some("a@b.id".into()), None, None).is_none());
        assert!(BootstrapAdmin::from_parts(Some("  ".into()), Some("x".into()), None).is_none());
        assert!(BootstrapAdmin::from_parts(Some("a@b.id".into()), Some(String::new()), None).is_none());
    }

    #[test]
    fn bootstrap_admin_defaults_its_name() {
        let admin =
            BootstrapAdmin::from_parts(Some(" a@b.id ".into()), Some("rahasia".into()), None)
                .unwrap();

        assert_eq!(admin.email, "a@b.id");
        assert_eq!(admin.full_name, "Administrator");
        assert_eq!(admin.password.expose_secret(), "rahasia");
    }
}
