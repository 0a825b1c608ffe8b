//! Inventory category model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Name of the "no category" entry, compared case-insensitively.
pub const SENTINEL_CATEGORY_NAME: &str = "tidak ada";

/// Shown on a category card when the description is missing.
pub const DESCRIPTION_PLACEHOLDER: &str = "--";

/// Returns true when `name` denotes the sentinel category.
pub fn is_sentinel_name(name: &str) -> bool {
    name.to_lowercase() == SENTINEL_CATEGORY_NAME
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

impl Category {
    /// The sentinel cannot be edited or deleted.
    pub fn is_sentinel(&self) -> bool {
        is_sentinel_name(&self.name)
    }

    pub fn description_or_placeholder(&self) -> &str {
        match self.description.as_deref() {
            Some(desc) if !desc.is_empty() => desc,
            _ => DESCRIPTION_PLACEHOLDER,
        }
    }
}

/// Values written by create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
}
