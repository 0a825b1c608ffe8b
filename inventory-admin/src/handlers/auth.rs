use super::{Chrome, GENERIC_FAILURE, USER_NAME_KEY};
use crate::dtos::{FieldErrors, LoginForm};
use crate::flash::{Flash, FlashKind};
use crate::handlers::categories::CATEGORIES_PATH;
use crate::htmx;
use crate::middleware::{auth::has_petugas_flag, LOGIN_PATH, PETUGAS_FLAG};
use crate::utils::{verify_password, PasswordHashString};
use crate::AppState;
use askama::Template;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use service_core::error::AppError;
use tower_sessions::Session;
use validator::Validate;

pub const INVALID_CREDENTIALS: &str = "Email atau password salah";
pub const NO_PANEL_ACCESS: &str = "Akun ini tidak memiliki akses petugas";
pub const SIGNED_OUT: &str = "Anda telah keluar";

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub current_page: &'static str,
    pub chrome: Chrome,
    pub email: String,
    pub errors: FieldErrors,
}

/// `GET /login`
pub async fn login_page(session: Session, headers: HeaderMap) -> Response {
    if has_petugas_flag(&session).await {
        return htmx::redirect(&headers, CATEGORIES_PATH);
    }

    LoginTemplate {
        current_page: "login",
        chrome: Chrome::load(&session).await,
        email: String::new(),
        errors: FieldErrors::new(),
    }
    .into_response()
}

async fn refuse(session: &Session, headers: &HeaderMap, message: &str) -> Result<Response, AppError> {
    Flash::push(session, FlashKind::Error, message).await?;
    Ok(htmx::redirect(headers, LOGIN_PATH))
}

/// `POST /login`
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let form = form.normalized();
    if let Err(errors) = form.validate() {
        let page = LoginTemplate {
            current_page: "login",
            chrome: Chrome::load(&session).await,
            email: form.email.clone(),
            errors: (&errors).into(),
        };
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }

    let user = match state.store.find_user_by_email(&form.email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::info!("Login attempt for unknown account");
            return refuse(&session, &headers, INVALID_CREDENTIALS).await;
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to look up account");
            return refuse(&session, &headers, GENERIC_FAILURE).await;
        }
    };

    let stored_hash = PasswordHashString::new(user.password_hash.clone());
    match verify_password(&form.password(), &stored_hash) {
        Ok(()) => {}
        Err(AppError::Unauthorized(_)) => {
            tracing::info!(user_id = %user.user_id, "Login rejected: wrong password");
            return refuse(&session, &headers, INVALID_CREDENTIALS).await;
        }
        Err(e) => {
            tracing::error!(user_id = %user.user_id, error = %e, "Failed to verify password");
            return refuse(&session, &headers, GENERIC_FAILURE).await;
        }
    }

    if !user.parsed_role().is_some_and(|role| role.has_panel_access()) {
        tracing::info!(user_id = %user.user_id, role = %user.role, "Login rejected: no panel access");
        return refuse(&session, &headers, NO_PANEL_ACCESS).await;
    }

    session
        .cycle_id()
        .await
        .map_err(|e| AppError::SessionError(format!("Failed to cycle session id: {}", e)))?;
    session
        .insert(PETUGAS_FLAG, true)
        .await
        .map_err(|e| AppError::SessionError(format!("Failed to store session flag: {}", e)))?;
    session
        .insert(USER_NAME_KEY, &user.full_name)
        .await
        .map_err(|e| AppError::SessionError(format!("Failed to store user name: {}", e)))?;

    tracing::info!(user_id = %user.user_id, role = %user.role, "User logged in");

    Ok(htmx::redirect(&headers, CATEGORIES_PATH))
}

/// `POST /logout`
pub async fn logout(session: Session, headers: HeaderMap) -> Result<Response, AppError> {
    session.clear().await;
    Flash::push(&session, FlashKind::Success, SIGNED_OUT).await?;

    tracing::info!("User logged out");
    Ok(htmx::redirect(&headers, LOGIN_PATH))
}
