//! Client-side search core for a recipe API front end.
//!
//! Two independent features over the same API: free-text direct search with
//! numbered pagination and an optional fuzzy re-ranking, and ingredient
//! search with a per-item detail fan-out, debounced input and an
//! infinite-scroll feed. The library holds the whole data flow - query
//! building, HTTP, merging, pagination state, text cleanup - and leaves
//! rendering to the caller.

pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod fuzzy;
pub mod model;
pub mod query;
pub mod search;
pub mod summary;

pub use api::RecipeApi;
pub use config::ApiConfig;
pub use error::SearchError;
pub use feed::{Debouncer, FeedPhase, PageControl, ScrollFeed, PAGE_RANGE};
pub use model::{overlay, Recipe, SearchResponse};
pub use query::{QueryKind, RecipeQuery};
pub use search::{ResultPage, SearchOrchestrator, DISH_WORDS};
pub use summary::{clean_summary, strip_html, ELLIPSIS};

/// One-shot free-text search with configuration from the environment.
pub async fn search_recipes(text: &str) -> Result<ResultPage, SearchError> {
    let orchestrator = SearchOrchestrator::from_config(ApiConfig::load()?)?;
    let query = RecipeQuery::direct(text)?;
    orchestrator.search(&query).await
}

/// One-shot ingredient search (comma-separated list, forwarded as-is) with
/// configuration from the environment.
pub async fn search_by_ingredients(ingredients: &str) -> Result<ResultPage, SearchError> {
    let orchestrator = SearchOrchestrator::from_config(ApiConfig::load()?)?;
    let query = RecipeQuery::by_ingredients(ingredients)?;
    orchestrator.search(&query).await
}
