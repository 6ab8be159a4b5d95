//! Text helpers shared by search and rendering.
//!
//! - **Tag stripping**: the `<...>` scrub applied to item descriptions
//! - **Width handling**: Unicode-aware truncation for terminal cards
//!
//! # Examples
//!
//! ```
//! use pinfeed::util::{strip_tags, truncate_to_width};
//!
//! let text = strip_tags("<p>Core Web Vitals</p>");
//! assert_eq!(truncate_to_width(&text, 7), "Core...");
//! ```

mod text;

pub use text::{collapse_whitespace, display_width, strip_tags, truncate_to_width};
