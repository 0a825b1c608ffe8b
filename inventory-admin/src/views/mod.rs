//! Page state resolved from store data and query parameters, ready for the templates.

pub mod category;
pub mod user;

pub use category::{
    CategoryCardView, CategoryFormState, CategoryPageQuery, CategoryPageState, DeleteTarget,
};
pub use user::{RoleOption, UserFormState, UserPageQuery, UserRowView};

/// Parses an id from a query value, ignoring anything that is not a plain integer.
pub(crate) fn parse_id(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}
