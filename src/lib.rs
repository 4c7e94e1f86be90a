// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod cache;
pub mod config;
pub mod history;
pub mod metrics;
pub mod pipeline;
pub mod upstream;
pub mod validate;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::config::AppConfig;
pub use crate::pipeline::{NewsError, NewsPipeline, NewsResponse};
pub use crate::upstream::{Article, FetchError, FetchedNews, NewsSource};
pub use crate::validate::{FieldError, NewsQuery, SortBy};
