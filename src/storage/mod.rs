mod bookmarks;
mod local;
mod schema;
mod types;

pub use bookmarks::{BookmarkSet, BookmarkStore, BOOKMARKS_KEY};
pub use schema::Database;
pub use types::DatabaseError;
