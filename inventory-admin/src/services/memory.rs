//! In-process store used by tests and local runs without PostgreSQL.

use crate::models::{Category, CategoryInput, NewUser, User};
use crate::services::store::{CategoryStore, Store, UserStore};
use async_trait::async_trait;
use chrono::Utc;
use service_core::error::AppError;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// A mutation that reached the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    CreateCategory { name: String },
    UpdateCategory { id: i64 },
    DeleteCategory { id: i64 },
    CreateUser { email: String },
}

#[derive(Default)]
struct Inner {
    categories: BTreeMap<i64, Category>,
    next_category_id: i64,
    users: Vec<User>,
    calls: Vec<StoreCall>,
    failing: bool,
}

/// Mirrors the PostgreSQL store, including the seeded "Tidak Ada" category, and
/// records every mutation it receives.
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        let store = Self {
            inner: Mutex::new(Inner {
                next_category_id: 1,
                ..Inner::default()
            }),
        };
        store.seed_category("Tidak Ada", None);
        store
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert a category without recording a call.
    pub fn seed_category(&self, name: &str, description: Option<&str>) -> Category {
        let mut inner = self.lock();
        let id = inner.next_category_id;
        inner.next_category_id += 1;

        let now = Utc::now();
        let category = Category {
            id,
            name: name.to_string(),
            description: description.map(str::to_string),
            created_utc: now,
            updated_utc: now,
        };
        inner.categories.insert(id, category.clone());
        category
    }

    /// Insert a user without recording a call.
    pub fn seed_user(&self, input: &NewUser) -> User {
        let user = new_user(input);
        self.lock().users.push(user.clone());
        user
    }

    /// Mutations received so far, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// While set, every mutation fails with a database error.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    fn record(&self, call: StoreCall) -> Result<MutexGuard<'_, Inner>, AppError> {
        let mut inner = self.lock();
        inner.calls.push(call);
        if inner.failing {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "in-memory store is failing"
            )));
        }
        Ok(inner)
    }
}

fn new_user(input: &NewUser) -> User {
    User {
        user_id: Uuid::new_v4(),
        email: input.email.clone(),
        password_hash: input.password_hash.clone(),
        full_name: input.full_name.clone(),
        role: input.role.as_str().to_string(),
        created_utc: Utc::now(),
    }
}

#[async_trait]
impl CategoryStore for InMemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.lock().categories.values().cloned().collect())
    }

    async fn get_category(&self, id: i64) -> Result<Option<Category>, AppError> {
        Ok(self.lock().categories.get(&id).cloned())
    }

    async fn create_category(&self, input: &CategoryInput) -> Result<Category, AppError> {
        let mut inner = self.record(StoreCall::CreateCategory {
            name: input.name.clone(),
        })?;

        let id = inner.next_category_id;
        inner.next_category_id += 1;
        let now = Utc::now();
        let category = Category {
            id,
            name: input.name.clone(),
            description: input.description.clone(),
            created_utc: now,
            updated_utc: now,
        };
        inner.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: i64,
        input: &CategoryInput,
    ) -> Result<Option<Category>, AppError> {
        let mut inner = self.record(StoreCall::UpdateCategory { id })?;

        Ok(inner.categories.get_mut(&id).map(|category| {
            category.name = input.name.clone();
            category.description = input.description.clone();
            category.updated_utc = Utc::now();
            category.clone()
        }))
    }

    async fn delete_category(&self, id: i64) -> Result<bool, AppError> {
        let mut inner = self.record(StoreCall::DeleteCategory { id })?;
        Ok(inner.categories.remove(&id).is_some())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.lock().users.clone())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, input: &NewUser) -> Result<User, AppError> {
        let mut inner = self.record(StoreCall::CreateUser {
            email: input.email.clone(),
        })?;

        if inner.users.iter().any(|u| u.email == input.email) {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Email '{}' is already registered",
                input.email
            )));
        }

        let user = new_user(input);
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn count_users(&self) -> Result<i64, AppError> {
        Ok(self.lock().users.len() as i64)
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn health_check(&self) -> Result<(), AppError> {
        if self.lock().failing {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "in-memory store is failing"
            )));
        }
        Ok(())
    }
}
