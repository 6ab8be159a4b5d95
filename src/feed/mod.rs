//! Feed pipeline: retrieval through the RSS-to-JSON proxy and enrichment.
//!
//! - [`loader`] - proxy request with a 12-hour cache bucket, JSON decoding
//! - [`classifier`] - keyword-priority category detection
//! - [`thumbnail`] - display image fallback chain
//! - [`types`] - raw and enriched item models
//!
//! # Example
//!
//! ```ignore
//! use pinfeed::feed::{build_client, FeedLoader};
//!
//! let loader = FeedLoader::new(build_client()?, proxy, feed);
//! let items = loader.load_items().await; // empty on failure
//! ```

mod classifier;
mod loader;
mod thumbnail;
mod types;

pub use classifier::{classify, Category, CategoryFilter, UnknownCategory, KEYWORDS};
pub use loader::{
    build_client, cache_bucket, request_url, FeedLoader, LoadError, LoadOutcome, CACHE_WINDOW_MS,
};
pub use thumbnail::{first_src, resolve_thumbnail, DEFAULT_PLACEHOLDER};
pub use types::{EnrichedItem, Enclosure, FeedItem, FeedMeta, FeedResponse};
