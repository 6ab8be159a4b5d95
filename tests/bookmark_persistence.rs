//! Integration tests for saved pins across sessions.
//!
//! Each test uses its own database file under the system temp directory,
//! closing and reopening it to simulate a restart.

use pinfeed::app::App;
use pinfeed::storage::{BookmarkStore, Database, BOOKMARKS_KEY};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn db_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pinfeed_bookmarks_test_{}", name));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir.join("pins.db")
}

async fn open(path: &PathBuf) -> Database {
    Database::open(path.to_str().unwrap()).await.unwrap()
}

// ============================================================================
// Reload Tests
// ============================================================================

#[tokio::test]
async fn test_bookmarks_survive_reopen() {
    let path = db_path("survive_reopen");

    let db = open(&path).await;
    let mut store = BookmarkStore::load(db.clone()).await;
    assert!(store.toggle("pin-b").await.unwrap());
    assert!(store.toggle("pin-a").await.unwrap());
    db.close().await;

    let db = open(&path).await;
    let store = BookmarkStore::load(db.clone()).await;
    assert!(store.is_bookmarked("pin-a"));
    assert!(store.is_bookmarked("pin-b"));
    assert_eq!(
        store.bookmarks().iter().collect::<Vec<_>>(),
        vec!["pin-b", "pin-a"]
    );
    db.close().await;
}

#[tokio::test]
async fn test_unsave_survives_reopen() {
    let path = db_path("unsave_reopen");

    let db = open(&path).await;
    let mut app = App::new(db.clone()).await;
    app.toggle_bookmark("pin-1").await.unwrap();
    app.toggle_bookmark("pin-2").await.unwrap();
    assert!(!app.toggle_bookmark("pin-1").await.unwrap());
    db.close().await;

    let db = open(&path).await;
    let app = App::new(db.clone()).await;
    assert!(!app.is_bookmarked("pin-1"));
    assert!(app.is_bookmarked("pin-2"));
    db.close().await;
}

#[tokio::test]
async fn test_clear_survives_reopen() {
    let path = db_path("clear_reopen");

    let db = open(&path).await;
    let mut store = BookmarkStore::load(db.clone()).await;
    store.toggle("pin-1").await.unwrap();
    store.clear().await.unwrap();
    db.close().await;

    let db = open(&path).await;
    assert_eq!(db.get_item(BOOKMARKS_KEY).await.unwrap(), None);
    assert!(BookmarkStore::load(db.clone()).await.bookmarks().is_empty());
    db.close().await;
}

// ============================================================================
// Corrupt Data Tests
// ============================================================================

#[tokio::test]
async fn test_corrupt_value_from_previous_session() {
    let path = db_path("corrupt_value");

    let db = open(&path).await;
    db.set_item(BOOKMARKS_KEY, "{\"not\": \"a list\"}").await.unwrap();
    db.close().await;

    let db = open(&path).await;
    let mut store = BookmarkStore::load(db.clone()).await;
    assert!(store.bookmarks().is_empty());

    store.toggle("pin-1").await.unwrap();
    assert_eq!(
        db.get_item(BOOKMARKS_KEY).await.unwrap().as_deref(),
        Some(r#"["pin-1"]"#)
    );
    db.close().await;
}

#[tokio::test]
async fn test_other_keys_are_untouched() {
    let path = db_path("other_keys");

    let db = open(&path).await;
    db.set_item("theme", "dark").await.unwrap();
    let mut store = BookmarkStore::load(db.clone()).await;
    store.toggle("pin-1").await.unwrap();
    store.clear().await.unwrap();

    assert_eq!(db.get_item("theme").await.unwrap().as_deref(), Some("dark"));
    db.close().await;
}
