use regex::Regex;
use std::sync::OnceLock;

use super::types::FeedItem;

/// Image shown when a pin carries no usable picture.
pub const DEFAULT_PLACEHOLDER: &str = "https://picsum.photos/400/600";

static SRC_PATTERN: OnceLock<Regex> = OnceLock::new();

fn src_pattern() -> &'static Regex {
    SRC_PATTERN.get_or_init(|| Regex::new(r#"src="([^"]+)""#).expect("src pattern is valid"))
}

/// Picks the display image for a feed item.
///
/// Priority: enclosure link, then the raw `thumbnail` field, then the first
/// `src="..."` attribute in the description, then `placeholder`.
pub fn resolve_thumbnail(item: &FeedItem, placeholder: &str) -> String {
    if let Some(enclosure) = &item.enclosure {
        if !enclosure.link.is_empty() {
            return enclosure.link.clone();
        }
    }

    if let Some(thumbnail) = &item.thumbnail {
        if !thumbnail.is_empty() {
            return thumbnail.clone();
        }
    }

    first_src(&item.description)
        .map(str::to_string)
        .unwrap_or_else(|| placeholder.to_string())
}

/// First double-quoted `src` attribute value in an HTML fragment.
pub fn first_src(html: &str) -> Option<&str> {
    src_pattern()
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
