//! Persistence seams for categories and users.

use crate::models::{Category, CategoryInput, NewUser, User};
use async_trait::async_trait;
use service_core::error::AppError;

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// All categories ordered by id.
    async fn list_categories(&self) -> Result<Vec<Category>, AppError>;

    async fn get_category(&self, id: i64) -> Result<Option<Category>, AppError>;

    async fn create_category(&self, input: &CategoryInput) -> Result<Category, AppError>;

    /// `None` when no category has this id.
    async fn update_category(
        &self,
        id: i64,
        input: &CategoryInput,
    ) -> Result<Option<Category>, AppError>;

    /// `false` when no category has this id.
    async fn delete_category(&self, id: i64) -> Result<bool, AppError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users ordered by creation time.
    async fn list_users(&self) -> Result<Vec<User>, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Fails with `AppError::Conflict` when the e-mail is taken.
    async fn create_user(&self, input: &NewUser) -> Result<User, AppError>;

    async fn count_users(&self) -> Result<i64, AppError>;
}

/// Everything the handlers need from persistence.
#[async_trait]
pub trait Store: CategoryStore + UserStore {
    async fn health_check(&self) -> Result<(), AppError>;
}
