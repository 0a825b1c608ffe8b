//! Application startup and lifecycle management.

use crate::config::{AdminConfig, BootstrapAdmin, SessionSettings};
use crate::handlers::{
    app::{health_check, index, metrics_handler, readiness_check},
    auth::{login, login_page, logout},
    categories::{categories_page, create_category, delete_category, update_category},
    users::{create_user, users_page},
};
use crate::middleware::{petugas_gate, track_metrics};
use crate::models::{NewUser, Role};
use crate::services::{init_metrics, Database, Store, UserStore};
use crate::utils::{hash_password, Password};
use crate::AppState;
use axum::{
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    security_headers::security_headers_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

pub fn build_router(state: AppState, session: &SessionSettings, static_dir: &str) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(session.secure_cookie)
        .with_expiry(Expiry::OnInactivity(session.inactivity()));

    let protected = Router::new()
        .route("/", get(index))
        .route("/categories", get(categories_page).post(create_category))
        .route(
            "/categories/:id",
            put(update_category).delete(delete_category),
        )
        .route("/users", get(users_page).post(create_user))
        .route("/logout", post(logout))
        .route_layer(from_fn(petugas_gate));

    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .merge(protected)
        .route_layer(from_fn(track_metrics))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Creates the bootstrap administrator when configured and no user exists yet.
/// Returns whether an account was created.
pub async fn ensure_bootstrap_admin<S>(
    store: &S,
    admin: Option<&BootstrapAdmin>,
) -> Result<bool, AppError>
where
    S: UserStore + ?Sized,
{
    let Some(admin) = admin else {
        return Ok(false);
    };

    if store.count_users().await? > 0 {
        tracing::debug!("Users present, skipping bootstrap admin");
        return Ok(false);
    }

    let password_hash = hash_password(&Password::from(admin.password.clone()))?;
    let user = store
        .create_user(&NewUser {
            email: admin.email.clone(),
            password_hash: password_hash.into_string(),
            full_name: admin.full_name.clone(),
            role: Role::Admin,
        })
        .await?;

    tracing::info!(user_id = %user.user_id, "Bootstrap admin created");
    Ok(true)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Connect to PostgreSQL, run migrations and bind the listener.
    pub async fn build(config: AdminConfig) -> Result<Self, AppError> {
        init_metrics();

        let db = Database::new(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to PostgreSQL");
            e
        })?;

        db.run_migrations().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to run migrations");
            e
        })?;

        let store: Arc<dyn Store> = Arc::new(db);
        Self::build_with_store(config, store).await
    }

    /// Bind the listener over an already constructed store.
    pub async fn build_with_store(
        config: AdminConfig,
        store: Arc<dyn Store>,
    ) -> Result<Self, AppError> {
        ensure_bootstrap_admin(store.as_ref(), config.bootstrap_admin.as_ref()).await?;

        let router = build_router(AppState::new(store), &config.session, &config.static_dir);

        let address = config.common.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, addr = %address, "Failed to bind HTTP listener");
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(port = port, "Inventory admin listener bound");

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!(
            service = "inventory-admin",
            version = env!("CARGO_PKG_VERSION"),
            port = self.port,
            "Service ready to accept connections"
        );

        axum::serve(self.listener, self.router).await
    }
}
