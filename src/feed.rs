//! Presentation-side state for the two search modes.
//!
//! Direct search uses numbered pages: selecting a page re-runs the search at
//! the new offset and replaces the visible items. Ingredient search uses an
//! infinite-scroll feed: new pages append, and a short page marks the query
//! exhausted. Both expose the `Idle -> Loading -> Idle` lifecycle and refuse
//! to start a fetch while one is in flight.

use std::time::Duration;

use log::debug;
use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::error::SearchError;
use crate::model::Recipe;
use crate::query::RecipeQuery;
use crate::search::SearchOrchestrator;

/// Pages offered by the numbered-page control
pub const PAGE_RANGE: std::ops::RangeInclusive<u32> = 1..=5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedPhase {
    #[default]
    Idle,
    Loading,
}

/// Numbered pagination for direct search. A page fetch replaces the visible
/// sequence; a failed fetch leaves it untouched.
pub struct PageControl {
    orchestrator: SearchOrchestrator,
    query: RecipeQuery,
    pub items: Vec<Recipe>,
    phase: FeedPhase,
}

impl PageControl {
    pub fn new(orchestrator: SearchOrchestrator, query: RecipeQuery) -> Self {
        Self {
            orchestrator,
            query,
            items: Vec::new(),
            phase: FeedPhase::Idle,
        }
    }

    pub fn phase(&self) -> FeedPhase {
        self.phase
    }

    pub fn page(&self) -> u32 {
        self.query.page
    }

    /// Fetch the currently selected page.
    pub async fn load(&mut self) -> Result<(), SearchError> {
        self.select_page(self.query.page).await
    }

    /// Jump to a page and replace the visible items with that page's results.
    ///
    /// A request arriving while one is already in flight is coalesced into a
    /// no-op rather than racing it.
    pub async fn select_page(&mut self, page: u32) -> Result<(), SearchError> {
        if self.phase == FeedPhase::Loading {
            debug!("page select ignored, fetch already in flight");
            return Ok(());
        }

        let query = self.query.clone().with_page(page);
        self.phase = FeedPhase::Loading;
        let result = self.orchestrator.search(&query).await;
        self.phase = FeedPhase::Idle;

        let result_page = result?;
        self.query = query;
        self.items = result_page.items;
        Ok(())
    }
}

/// Infinite-scroll feed for ingredient search.
pub struct ScrollFeed {
    orchestrator: SearchOrchestrator,
    query: Option<RecipeQuery>,
    pub items: Vec<Recipe>,
    next_page: u32,
    has_more: bool,
    phase: FeedPhase,
}

impl ScrollFeed {
    pub fn new(orchestrator: SearchOrchestrator) -> Self {
        Self {
            orchestrator,
            query: None,
            items: Vec::new(),
            next_page: 2,
            has_more: false,
            phase: FeedPhase::Idle,
        }
    }

    pub fn phase(&self) -> FeedPhase {
        self.phase
    }

    /// Whether reaching the bottom should fetch another page.
    pub fn wants_more(&self) -> bool {
        self.has_more && self.phase == FeedPhase::Idle
    }

    pub fn query_text(&self) -> Option<&str> {
        self.query.as_ref().map(|q| q.text())
    }

    /// Start a fresh query, replacing the feed wholesale on success.
    ///
    /// Blank input is the client-side guard: the feed is left exactly as it
    /// was and nothing goes out on the wire. A failed list call likewise
    /// leaves the previous items in place. State is only committed after the
    /// fetch settles, so a driver that drops a superseded `submit` future
    /// cancels the request without corrupting the feed; the next `submit`
    /// also resets any `Loading` phase such a drop left behind.
    pub async fn submit(&mut self, raw_ingredients: &str) -> Result<usize, SearchError> {
        let query = RecipeQuery::by_ingredients(raw_ingredients)?
            .with_per_page(self.orchestrator.config().page_size);

        self.phase = FeedPhase::Loading;
        let result = self.orchestrator.search(&query).await;
        self.phase = FeedPhase::Idle;

        let page = result?;
        self.has_more = page.is_full();
        self.items = page.items;
        self.query = Some(query);
        self.next_page = 2;
        Ok(self.items.len())
    }

    /// Append the next page. No-ops (returning `false`) while a fetch is in
    /// flight, before any query was submitted, or once the query is
    /// exhausted - a page shorter than the requested size stops the feed
    /// from ever asking again.
    pub async fn load_more(&mut self) -> Result<bool, SearchError> {
        if self.phase == FeedPhase::Loading || !self.has_more {
            return Ok(false);
        }
        let Some(base) = self.query.clone() else {
            return Ok(false);
        };

        let query = base.with_page(self.next_page);
        self.phase = FeedPhase::Loading;
        let result = self.orchestrator.search(&query).await;
        self.phase = FeedPhase::Idle;

        let page = result?;
        self.has_more = page.is_full();
        self.next_page += 1;
        self.items.extend(page.items);
        Ok(true)
    }
}

/// Timer-based coalescing queue for keystroke-driven input.
///
/// Every input restarts the quiet-period clock; once it runs out only the
/// latest value is emitted. Five keystrokes inside one window become a
/// single search for the final string.
pub struct Debouncer {
    tx: mpsc::UnboundedSender<String>,
}

impl Debouncer {
    /// Spawn the coalescing task. Settled values arrive on the returned
    /// receiver; the task ends when the `Debouncer` is dropped, flushing any
    /// pending value first.
    pub fn spawn(delay: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (in_tx, mut in_rx) = mpsc::unbounded_channel::<String>();
        let (out_tx, out_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(mut latest) = in_rx.recv().await {
                loop {
                    tokio::select! {
                        more = in_rx.recv() => match more {
                            Some(value) => latest = value,
                            None => {
                                let _ = out_tx.send(latest);
                                return;
                            }
                        },
                        _ = sleep(delay) => {
                            let _ = out_tx.send(latest);
                            break;
                        }
                    }
                }
            }
        });

        (Self { tx: in_tx }, out_rx)
    }

    pub fn input(&self, value: impl Into<String>) {
        let _ = self.tx.send(value.into());
    }
}
