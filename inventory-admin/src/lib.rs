pub mod config;
pub mod dtos;
pub mod flash;
pub mod handlers;
pub mod htmx;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;
pub mod views;

use services::Store;
use std::sync::Arc;

/// Shared application state: the category and user store.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}
