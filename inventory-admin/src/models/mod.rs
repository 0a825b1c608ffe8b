pub mod category;
pub mod user;

pub use category::{Category, CategoryInput};
pub use user::{NewUser, Role, User};
