//! # restaurant-search
//!
//! Read-only search over a restaurant catalog: validated query parameters in,
//! one filtered, sorted page of restaurants out.
//!
//! ```rust,ignore
//! use restaurant_search::{AppState, SeaOrmStore, router};
//!
//! let store = SeaOrmStore::connect("sqlite::memory:").await?;
//! store.ensure_schema().await?;
//! let app = router(AppState::new(store));
//! ```

pub mod config;
pub mod core;
pub mod errors;
pub mod filtering;
pub mod logging;
pub mod models;
pub mod openapi;
pub mod operations;
pub mod restaurant;
pub mod routes;
pub mod validation;

pub use crate::core::{SeaOrmStore, SearchStore};
pub use errors::ApiError;
pub use models::{SearchRequest, SearchResponse};
pub use operations::search_restaurants;
pub use routes::{AppState, router};
