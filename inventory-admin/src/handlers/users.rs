use super::{Chrome, GENERIC_FAILURE};
use crate::dtos::{CreateUserForm, FieldErrors};
use crate::flash::{Flash, FlashKind};
use crate::htmx;
use crate::models::NewUser;
use crate::services::metrics::record_mutation;
use crate::utils::hash_password;
use crate::views::{UserFormState, UserPageQuery, UserRowView};
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use service_core::error::AppError;
use tower_sessions::Session;
use validator::Validate;

pub const USERS_PATH: &str = "/users";

pub const CREATED: &str = "Pengguna berhasil ditambahkan";
pub const EMAIL_TAKEN: &str = "Email sudah terdaftar";

#[derive(Template)]
#[template(path = "users.html")]
pub struct UsersTemplate {
    pub current_page: &'static str,
    pub chrome: Chrome,
    pub users: Vec<UserRowView>,
    pub form: UserFormState,
}

async fn render(
    state: &AppState,
    session: &Session,
    form: UserFormState,
) -> Result<UsersTemplate, AppError> {
    let users = state.store.list_users().await?;

    Ok(UsersTemplate {
        current_page: "users",
        chrome: Chrome::load(session).await,
        users: users.iter().map(UserRowView::from).collect(),
        form,
    })
}

/// `GET /users`
pub async fn users_page(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<UserPageQuery>,
) -> Result<Response, AppError> {
    let form = if query.dialog_open() {
        UserFormState::opened()
    } else {
        UserFormState::closed()
    };

    Ok(render(&state, &session, form).await?.into_response())
}

async fn reject(
    state: &AppState,
    session: &Session,
    form: &CreateUserForm,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    tracing::debug!(fields = errors.len(), "User form rejected");
    let page = render(state, session, UserFormState::rejected(form, errors)).await?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
}

/// `POST /users`
pub async fn create_user(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CreateUserForm>,
) -> Result<Response, AppError> {
    let form = form.normalized();
    if let Err(errors) = form.validate() {
        return reject(&state, &session, &form, (&errors).into()).await;
    }

    let Some(role) = form.role() else {
        let mut errors = FieldErrors::new();
        errors.insert("user_role", "Role tidak valid");
        return reject(&state, &session, &form, errors).await;
    };

    let created = match hash_password(&form.password()) {
        Ok(hash) => {
            let new_user = NewUser {
                email: form.user_email.clone(),
                password_hash: hash.into_string(),
                full_name: form.user_fullname.clone(),
                role,
            };
            state.store.create_user(&new_user).await
        }
        Err(e) => Err(e),
    };

    match created {
        Ok(user) => {
            tracing::info!(user_id = %user.user_id, role = %role, "User created");
            record_mutation("user", "create", "ok");
            Flash::push(&session, FlashKind::Success, CREATED).await?;
        }
        Err(AppError::Conflict(_)) => {
            record_mutation("user", "create", "refused");
            let mut errors = FieldErrors::new();
            errors.insert("user_email", EMAIL_TAKEN);
            return reject(&state, &session, &form, errors).await;
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create user");
            record_mutation("user", "create", "error");
            Flash::push(&session, FlashKind::Error, GENERIC_FAILURE).await?;
        }
    }

    Ok(htmx::redirect(&headers, USERS_PATH))
}
