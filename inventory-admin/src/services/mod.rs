pub mod database;
pub mod memory;
pub mod metrics;
pub mod store;

pub use database::Database;
pub use memory::{InMemoryStore, StoreCall};
pub use metrics::{get_metrics, init_metrics};
pub use store::{CategoryStore, Store, UserStore};
