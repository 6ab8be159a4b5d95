//! Gallery view model: which loaded items are visible.

mod filter;

pub use filter::{filter_items, FilterState};
