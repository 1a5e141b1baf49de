use futures::future::join_all;
use log::{debug, warn};

use crate::api::RecipeApi;
use crate::config::ApiConfig;
use crate::error::SearchError;
use crate::fuzzy;
use crate::model::{overlay, Recipe};
use crate::query::{QueryKind, RecipeQuery};

/// Queries mentioning one of these get their results re-ranked through the
/// fuzzy title filter; anything else is returned in API order.
pub const DISH_WORDS: [&str; 4] = ["recipe", "dish", "meal", "cooking"];

/// One batch of results for a query at a given offset.
#[derive(Debug, Clone)]
pub struct ResultPage {
    pub query_text: String,
    pub offset: u32,
    pub items: Vec<Recipe>,
    full: bool,
}

impl ResultPage {
    /// Whether the list call filled the requested page size. A short page
    /// means the query is exhausted and more offsets will not help.
    pub fn is_full(&self) -> bool {
        self.full
    }
}

/// Entry point for both search modes.
#[derive(Clone)]
pub struct SearchOrchestrator {
    api: RecipeApi,
}

impl SearchOrchestrator {
    pub fn new(api: RecipeApi) -> Self {
        Self { api }
    }

    pub fn from_config(config: ApiConfig) -> Result<Self, SearchError> {
        Ok(Self::new(RecipeApi::new(config)?))
    }

    pub fn config(&self) -> &ApiConfig {
        self.api.config()
    }

    /// Run one page of a search.
    ///
    /// A failed list call is the page-level error; the caller's existing
    /// results are its own business and stay untouched. Detail failures in
    /// ingredient mode never surface here.
    pub async fn search(&self, query: &RecipeQuery) -> Result<ResultPage, SearchError> {
        match &query.kind {
            QueryKind::Text(_) => self.direct_search(query).await,
            QueryKind::Ingredients(_) => self.ingredient_search(query).await,
        }
    }

    async fn direct_search(&self, query: &RecipeQuery) -> Result<ResultPage, SearchError> {
        let response = self.api.complex_search(query).await?;
        let fetched = response.results.len();
        debug!("complexSearch returned {fetched} items at offset {}", query.offset());

        let items = if mentions_dish_word(query.text()) {
            fuzzy::filter_by_title(
                query.text(),
                response.results,
                self.config().fuzzy_threshold,
            )
        } else {
            response.results
        };

        Ok(self.page(query, items, fetched))
    }

    async fn ingredient_search(&self, query: &RecipeQuery) -> Result<ResultPage, SearchError> {
        let summaries = self.api.find_by_ingredients(query).await?;
        let fetched = summaries.len();
        debug!("findByIngredients returned {fetched} items at offset {}", query.offset());

        let items = if query.want_details {
            // Fan out one detail fetch per item and wait for all of them.
            // A failed branch degrades that item to its summary record and
            // never drops it from the page.
            join_all(summaries.into_iter().map(|summary| {
                let api = self.api.clone();
                async move {
                    match api.recipe_information(summary.id).await {
                        Ok(detail) => overlay(summary, detail),
                        Err(e) => {
                            warn!("Detail fetch for recipe {} failed: {e}", summary.id);
                            summary
                        }
                    }
                }
            }))
            .await
        } else {
            summaries
        };

        Ok(self.page(query, items, fetched))
    }

    fn page(&self, query: &RecipeQuery, items: Vec<Recipe>, fetched: usize) -> ResultPage {
        ResultPage {
            query_text: query.text().to_string(),
            offset: query.offset(),
            items,
            // Judged on the list call's count, before any local filtering
            full: fetched >= query.per_page as usize,
        }
    }
}

fn mentions_dish_word(text: &str) -> bool {
    text.to_lowercase()
        .split_whitespace()
        .any(|word| DISH_WORDS.contains(&word))
}
