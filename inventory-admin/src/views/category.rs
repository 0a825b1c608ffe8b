use super::parse_id;
use crate::dtos::{CategoryForm, FieldErrors};
use crate::models::Category;
use serde::Deserialize;

/// `GET /categories` query: `?edit={id}` selects the update form, `?delete={id}`
/// opens the delete confirmation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPageQuery {
    pub edit: Option<String>,
    pub delete: Option<String>,
}

impl CategoryPageQuery {
    pub fn editing(id: i64) -> Self {
        Self {
            edit: Some(id.to_string()),
            delete: None,
        }
    }

    pub fn edit_id(&self) -> Option<i64> {
        parse_id(self.edit.as_deref())
    }

    pub fn delete_id(&self) -> Option<i64> {
        parse_id(self.delete.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCardView {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// False for the sentinel: no edit or delete controls.
    pub show_actions: bool,
}

impl From<&Category> for CategoryCardView {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            description: category.description_or_placeholder().to_string(),
            show_actions: !category.is_sentinel(),
        }
    }
}

/// The single visible category form. `editing_id` set means the update form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFormState {
    pub editing_id: Option<i64>,
    pub name: String,
    pub description: String,
    pub errors: FieldErrors,
}

impl CategoryFormState {
    pub fn create() -> Self {
        Self::default()
    }

    /// Update form pre-populated with the category's stored values.
    pub fn edit(category: &Category) -> Self {
        Self {
            editing_id: Some(category.id),
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
            errors: FieldErrors::new(),
        }
    }

    /// Re-displays a submission that failed validation.
    pub fn rejected(editing_id: Option<i64>, form: &CategoryForm, errors: FieldErrors) -> Self {
        Self {
            editing_id,
            name: form.category_name.clone(),
            description: form.category_desc.clone().unwrap_or_default(),
            errors,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    /// Target of the update form's `hx-put`.
    pub fn action(&self) -> String {
        match self.editing_id {
            Some(id) => format!("/categories/{}", id),
            None => "/categories".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteTarget {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct CategoryPageState {
    pub cards: Vec<CategoryCardView>,
    pub form: CategoryFormState,
    pub delete_target: Option<DeleteTarget>,
}

impl CategoryPageState {
    /// Unknown and sentinel ids in the query are ignored.
    pub fn resolve(categories: &[Category], query: &CategoryPageQuery) -> Self {
        let selectable = |id: Option<i64>| {
            id.and_then(|id| {
                categories
                    .iter()
                    .find(|c| c.id == id && !c.is_sentinel())
            })
        };

        let form = selectable(query.edit_id())
            .map(CategoryFormState::edit)
            .unwrap_or_else(CategoryFormState::create);

        let delete_target = selectable(query.delete_id()).map(|c| DeleteTarget {
            id: c.id,
            name: c.name.clone(),
        });

        Self {
            cards: categories.iter().map(CategoryCardView::from).collect(),
            form,
            delete_target,
        }
    }

    pub fn with_form(mut self, form: CategoryFormState) -> Self {
        self.form = form;
        self
    }
}
