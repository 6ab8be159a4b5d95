use anyhow::Result;
use std::sync::Arc;

use crate::feed::{CategoryFilter, EnrichedItem, FeedLoader, LoadOutcome};
use crate::gallery::{filter_items, FilterState};
use crate::storage::{BookmarkStore, Database};

// ============================================================================
// Load State
// ============================================================================

/// Where the item set came from. `Empty` and `Failed` both leave the
/// gallery with no items, but only `Failed` carries an error to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Empty,
    Failed(String),
}

// ============================================================================
// App
// ============================================================================

/// Application controller. Owns every piece of state the gallery needs;
/// nothing lives in globals.
pub struct App {
    /// Full item set from the last load (Arc for cheap hand-off to renderers)
    pub items: Arc<Vec<EnrichedItem>>,
    pub load_state: LoadState,
    pub filter: FilterState,
    pub bookmarks: BookmarkStore,
}

impl App {
    pub async fn new(db: Database) -> Self {
        Self {
            items: Arc::new(Vec::new()),
            load_state: LoadState::Loading,
            filter: FilterState::default(),
            bookmarks: BookmarkStore::load(db).await,
        }
    }

    /// Replace the item set with a fresh load.
    ///
    /// Loads are not guarded against overlap; the last one to finish wins.
    pub async fn load(&mut self, loader: &FeedLoader) {
        self.load_state = LoadState::Loading;
        let outcome = loader.load().await;
        self.apply_outcome(outcome);
    }

    pub fn apply_outcome(&mut self, outcome: LoadOutcome) {
        match outcome {
            LoadOutcome::Loaded(items) => {
                self.items = Arc::new(items);
                self.load_state = LoadState::Ready;
            }
            LoadOutcome::Empty => {
                self.items = Arc::new(Vec::new());
                self.load_state = LoadState::Empty;
            }
            LoadOutcome::Failed(e) => {
                self.items = Arc::new(Vec::new());
                self.load_state = LoadState::Failed(e.to_string());
            }
        }
    }

    // ========================================================================
    // Filter Inputs
    // ========================================================================

    pub fn select_category(&mut self, category: CategoryFilter) {
        self.filter.category = category;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filter.search_term = term.into();
    }

    /// Returns the new bookmark-only flag.
    pub fn toggle_bookmarks_only(&mut self) -> bool {
        self.filter.bookmarks_only = !self.filter.bookmarks_only;
        self.filter.bookmarks_only
    }

    pub fn reset_filters(&mut self) {
        self.filter.reset();
    }

    // ========================================================================
    // Bookmarks
    // ========================================================================

    /// Save or unsave an item. Returns the new saved state.
    pub async fn toggle_bookmark(&mut self, guid: &str) -> Result<bool> {
        self.bookmarks.toggle(guid).await
    }

    pub fn is_bookmarked(&self, guid: &str) -> bool {
        self.bookmarks.is_bookmarked(guid)
    }

    // ========================================================================
    // Derived View
    // ========================================================================

    /// Visible items for the current inputs. Recomputed on every call.
    pub fn visible_items(&self) -> Vec<&EnrichedItem> {
        filter_items(&self.items, &self.filter, self.bookmarks.bookmarks())
    }

    /// True once loading has finished and nothing passes the filters.
    pub fn shows_no_results(&self) -> bool {
        self.load_state != LoadState::Loading && self.visible_items().is_empty()
    }

    pub fn find(&self, guid: &str) -> Option<&EnrichedItem> {
        self.items.iter().find(|item| item.guid() == guid)
    }
}
