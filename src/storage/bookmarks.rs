use anyhow::{Context, Result};

use super::schema::Database;

/// Storage key holding the saved guids as a JSON array.
pub const BOOKMARKS_KEY: &str = "wst_bookmarks";

// ============================================================================
// BookmarkSet
// ============================================================================

/// Saved item guids, in the order they were saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkSet {
    guids: Vec<String>,
}

impl BookmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a persisted value. Anything that is not a JSON array of
    /// strings yields an empty set; duplicate entries collapse.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(list) => list.into_iter().collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed bookmark data");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> String {
        // Vec<String> always serializes
        serde_json::to_string(&self.guids).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn contains(&self, guid: &str) -> bool {
        self.guids.iter().any(|g| g == guid)
    }

    /// Adds `guid` if absent, removes it if present. Returns the new state.
    pub fn toggle(&mut self, guid: &str) -> bool {
        if let Some(pos) = self.guids.iter().position(|g| g == guid) {
            self.guids.remove(pos);
            false
        } else {
            self.guids.push(guid.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.guids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.guids.iter().map(String::as_str)
    }
}

impl FromIterator<String> for BookmarkSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = BookmarkSet::default();
        for guid in iter {
            if !set.contains(&guid) {
                set.guids.push(guid);
            }
        }
        set
    }
}

// ============================================================================
// BookmarkStore
// ============================================================================

/// Bookmark set backed by local storage.
///
/// Reads are served from memory. Every toggle writes the whole set back
/// before the in-memory copy changes, so a store reopened on the same
/// database sees exactly what this one reports.
pub struct BookmarkStore {
    db: Database,
    set: BookmarkSet,
}

impl BookmarkStore {
    /// Read the persisted set. A missing key, unreadable storage or a
    /// malformed value all give an empty set.
    pub async fn load(db: Database) -> Self {
        let set = match db.get_item(BOOKMARKS_KEY).await {
            Ok(Some(raw)) => BookmarkSet::from_json(&raw),
            Ok(None) => BookmarkSet::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read bookmarks, starting empty");
                BookmarkSet::default()
            }
        };
        tracing::debug!(count = set.len(), "Bookmarks loaded");
        Self { db, set }
    }

    pub fn is_bookmarked(&self, guid: &str) -> bool {
        self.set.contains(guid)
    }

    /// Flip the saved state of `guid` and persist it. Returns the new state.
    pub async fn toggle(&mut self, guid: &str) -> Result<bool> {
        let mut next = self.set.clone();
        let saved = next.toggle(guid);

        self.db
            .set_item(BOOKMARKS_KEY, &next.to_json())
            .await
            .context("Failed to save bookmarks")?;

        self.set = next;
        tracing::debug!(guid = %guid, saved = saved, "Bookmark toggled");
        Ok(saved)
    }

    /// Forget every bookmark.
    pub async fn clear(&mut self) -> Result<()> {
        self.db
            .remove_item(BOOKMARKS_KEY)
            .await
            .context("Failed to clear bookmarks")?;
        self.set = BookmarkSet::default();
        Ok(())
    }

    pub fn bookmarks(&self) -> &BookmarkSet {
        &self.set
    }
}
