use crate::models::CategoryInput;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /categories` and `PUT /categories/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct CategoryForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Nama kategori wajib diisi"))]
    pub category_name: String,

    #[serde(default)]
    pub category_desc: Option<String>,
}

impl CategoryForm {
    /// Maps the submitted keys onto the stored fields; an empty description becomes NULL.
    pub fn into_input(self) -> CategoryInput {
        CategoryInput {
            name: self.category_name,
            description: self.category_desc.filter(|d| !d.is_empty()),
        }
    }
}
