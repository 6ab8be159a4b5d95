//! Terminal gallery for a Pinterest RSS feed.
//!
//! The feed is fetched through an RSS-to-JSON proxy, each pin is given a
//! category by keyword lookup and a display image, and the gallery is
//! filtered by category, saved pins, and free-text search.

pub mod app;
pub mod config;
pub mod feed;
pub mod gallery;
pub mod storage;
pub mod ui;
pub mod util;
