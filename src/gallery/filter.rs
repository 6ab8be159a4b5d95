use crate::feed::{CategoryFilter, EnrichedItem};
use crate::storage::BookmarkSet;
use crate::util::strip_tags;

/// Gallery filter inputs. Lives only in memory; every run starts from the
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub category: CategoryFilter,
    pub search_term: String,
    pub bookmarks_only: bool,
}

impl FilterState {
    /// Back to `All`, no search text, bookmark-only off.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Normalised search needle: trimmed and lowercased. `None` when blank.
    pub fn needle(&self) -> Option<String> {
        let term = self.search_term.trim().to_lowercase();
        (!term.is_empty()).then_some(term)
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Items to display for the given filter state, in their original order.
///
/// An item is kept when all of these hold:
/// - the category selection is `All` or equals its detected category
/// - bookmark-only mode is off or its guid is saved
/// - the search needle is empty, or occurs in the lowercased title, the
///   lowercased tag-stripped description, or the lowercased category label
pub fn filter_items<'a>(
    items: &'a [EnrichedItem],
    state: &FilterState,
    bookmarks: &BookmarkSet,
) -> Vec<&'a EnrichedItem> {
    let needle = state.needle();

    items
        .iter()
        .filter(|item| state.category.matches(item.detected_category))
        .filter(|item| !state.bookmarks_only || bookmarks.contains(item.guid()))
        .filter(|item| match &needle {
            None => true,
            Some(term) => matches_text(item, term),
        })
        .collect()
}

/// `term` must already be lowercase.
fn matches_text(item: &EnrichedItem, term: &str) -> bool {
    item.title().to_lowercase().contains(term)
        || strip_tags(item.description()).to_lowercase().contains(term)
        || item
            .detected_category
            .label()
            .to_lowercase()
            .contains(term)
}
