use super::{Chrome, GENERIC_FAILURE};
use crate::dtos::{CategoryForm, FieldErrors};
use crate::flash::{Flash, FlashKind};
use crate::htmx;
use crate::models::CategoryInput;
use crate::services::metrics::record_mutation;
use crate::services::Store;
use crate::views::{CategoryFormState, CategoryPageQuery, CategoryPageState};
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use service_core::error::AppError;
use tower_sessions::Session;
use validator::Validate;

pub const CATEGORIES_PATH: &str = "/categories";

pub const CREATED: &str = "Kategori berhasil ditambahkan";
pub const UPDATED: &str = "Kategori berhasil diperbarui";
pub const DELETED: &str = "Kategori berhasil dihapus";
pub const NOT_FOUND: &str = "Kategori tidak ditemukan";
pub const IMMUTABLE: &str = "Kategori ini tidak dapat diubah";

#[derive(Template)]
#[template(path = "categories.html")]
pub struct CategoriesTemplate {
    pub current_page: &'static str,
    pub chrome: Chrome,
    pub page: CategoryPageState,
}

async fn render(session: &Session, page: CategoryPageState) -> CategoriesTemplate {
    CategoriesTemplate {
        current_page: "categories",
        chrome: Chrome::load(session).await,
        page,
    }
}

/// `GET /categories`
pub async fn categories_page(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CategoryPageQuery>,
) -> Result<Response, AppError> {
    let categories = state.store.list_categories().await?;
    let page = CategoryPageState::resolve(&categories, &query);

    Ok(render(&session, page).await.into_response())
}

/// Re-renders the page with the rejected form. No mutation reaches the store.
async fn reject(
    store: &dyn Store,
    session: &Session,
    editing_id: Option<i64>,
    form: &CategoryForm,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    tracing::debug!(fields = errors.len(), "Category form rejected");

    let categories = store.list_categories().await?;
    let query = editing_id
        .map(CategoryPageQuery::editing)
        .unwrap_or_default();
    let page = CategoryPageState::resolve(&categories, &query);
    // Only an id the page itself would offer for editing keeps the update form.
    let editing_id = page.form.editing_id;
    let page = page.with_form(CategoryFormState::rejected(editing_id, form, errors));

    Ok((StatusCode::UNPROCESSABLE_ENTITY, render(session, page).await).into_response())
}

enum Outcome {
    Done(&'static str),
    Refused(&'static str),
    Failed(AppError),
}

/// Flashes the outcome and sends the browser back to the page.
async fn finish(
    session: &Session,
    headers: &HeaderMap,
    action: &'static str,
    outcome: Outcome,
    location: &str,
) -> Result<Response, AppError> {
    let (kind, message, label) = match outcome {
        Outcome::Done(message) => (FlashKind::Success, message, "ok"),
        Outcome::Refused(message) => {
            tracing::info!(action, reason = message, "Category mutation refused");
            (FlashKind::Error, message, "refused")
        }
        Outcome::Failed(e) => {
            tracing::error!(action, error = %e, "Category mutation failed");
            (FlashKind::Error, GENERIC_FAILURE, "error")
        }
    };

    record_mutation("category", action, label);
    Flash::push(session, kind, message).await?;
    Ok(htmx::redirect(headers, location))
}

/// `POST /categories`
pub async fn create_category(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CategoryForm>,
) -> Result<Response, AppError> {
    if let Err(errors) = form.validate() {
        return reject(state.store.as_ref(), &session, None, &form, (&errors).into()).await;
    }

    let outcome = match state.store.create_category(&form.into_input()).await {
        Ok(category) => {
            tracing::info!(category_id = category.id, "Category created");
            Outcome::Done(CREATED)
        }
        Err(e) => Outcome::Failed(e),
    };

    finish(&session, &headers, "create", outcome, CATEGORIES_PATH).await
}

/// Refuses ids that are missing or the sentinel before anything else happens.
async fn check_mutable(store: &dyn Store, id: i64) -> Option<Outcome> {
    match store.get_category(id).await {
        Err(e) => Some(Outcome::Failed(e)),
        Ok(None) => Some(Outcome::Refused(NOT_FOUND)),
        Ok(Some(category)) if category.is_sentinel() => Some(Outcome::Refused(IMMUTABLE)),
        Ok(Some(_)) => None,
    }
}

async fn apply_update(store: &dyn Store, id: i64, input: &CategoryInput) -> Outcome {
    match store.update_category(id, input).await {
        Ok(Some(_)) => Outcome::Done(UPDATED),
        Ok(None) => Outcome::Refused(NOT_FOUND),
        Err(e) => Outcome::Failed(e),
    }
}

/// `PUT /categories/{id}`
pub async fn update_category(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Form(form): Form<CategoryForm>,
) -> Result<Response, AppError> {
    if let Some(outcome) = check_mutable(state.store.as_ref(), id).await {
        let location = match outcome {
            Outcome::Failed(_) => format!("{}?edit={}", CATEGORIES_PATH, id),
            _ => CATEGORIES_PATH.to_string(),
        };
        return finish(&session, &headers, "update", outcome, &location).await;
    }

    if let Err(errors) = form.validate() {
        return reject(state.store.as_ref(), &session, Some(id), &form, (&errors).into()).await;
    }

    let outcome = apply_update(state.store.as_ref(), id, &form.into_input()).await;

    // A failed write keeps the update form open; everything else leaves edit mode.
    let location = match outcome {
        Outcome::Failed(_) => format!("{}?edit={}", CATEGORIES_PATH, id),
        _ => CATEGORIES_PATH.to_string(),
    };

    finish(&session, &headers, "update", outcome, &location).await
}

async fn apply_delete(store: &dyn Store, id: i64) -> Outcome {
    if let Some(outcome) = check_mutable(store, id).await {
        return outcome;
    }

    match store.delete_category(id).await {
        Ok(true) => Outcome::Done(DELETED),
        Ok(false) => Outcome::Refused(NOT_FOUND),
        Err(e) => Outcome::Failed(e),
    }
}

/// `DELETE /categories/{id}`
pub async fn delete_category(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let outcome = apply_delete(state.store.as_ref(), id).await;
    if let Outcome::Done(_) = outcome {
        tracing::info!(category_id = id, "Category deleted");
    }

    finish(&session, &headers, "delete", outcome, CATEGORIES_PATH).await
}
