use chrono::{DateTime, NaiveDateTime};
use std::fmt::Write;

use crate::app::{App, LoadState};
use crate::feed::{CategoryFilter, EnrichedItem};
use crate::util::{collapse_whitespace, strip_tags, truncate_to_width};

/// Characters of description shown under a card title.
const EXCERPT_WIDTH: usize = 160;
const NO_RESULTS: &str = "No assets found matching your criteria.";

/// Chip bar with the active selection in brackets.
pub fn render_chips(selected: CategoryFilter) -> String {
    CategoryFilter::CHIPS
        .iter()
        .map(|chip| {
            if *chip == selected {
                format!("[{}]", chip.label())
            } else {
                chip.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Publish date as `YYYY-MM-DD`.
///
/// The proxy sends `2024-05-01 12:00:00`; raw RSS dates are RFC 2822.
/// Anything else is shown as received.
pub fn format_pub_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return dt.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

/// One gallery card as a block of lines.
pub fn render_card(item: &EnrichedItem, saved: bool, width: usize) -> String {
    let mut out = String::new();
    let marker = if saved { "★" } else { " " };

    let _ = writeln!(
        out,
        "{} {:<12} {}",
        marker,
        item.detected_category.label().to_uppercase(),
        format_pub_date(&item.item.pub_date)
    );

    let title = if item.title().trim().is_empty() {
        "(untitled)"
    } else {
        item.title()
    };
    let _ = writeln!(out, "  {}", truncate_to_width(title, width.saturating_sub(2)));

    let description = collapse_whitespace(&strip_tags(item.description()));
    if !description.is_empty() {
        let limit = EXCERPT_WIDTH.min(width.saturating_sub(2));
        let _ = writeln!(out, "  {}", truncate_to_width(&description, limit));
    }

    let _ = writeln!(out, "  link:  {}", item.link());
    let _ = writeln!(out, "  image: {}", item.thumbnail);
    let _ = writeln!(out, "  id:    {}", item.guid());
    out
}

/// Full gallery: chip bar, then cards or the empty/error state.
pub fn render_gallery(app: &App, width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", render_chips(app.filter.category));
    if app.filter.bookmarks_only {
        let _ = writeln!(out, "Showing saved pins only");
    }
    let _ = writeln!(out);

    match &app.load_state {
        LoadState::Loading => {
            let _ = writeln!(out, "Fetching visual data...");
            return out;
        }
        LoadState::Failed(e) => {
            let _ = writeln!(out, "Could not load the feed: {}", e);
        }
        LoadState::Ready | LoadState::Empty => {}
    }

    let visible = app.visible_items();
    if visible.is_empty() {
        let _ = writeln!(out, "{}", NO_RESULTS);
        if !app.filter.is_default() {
            let _ = writeln!(out, "Run without --category/--search/--saved to reset all filters.");
        }
        return out;
    }

    for item in &visible {
        out.push_str(&render_card(item, app.is_bookmarked(item.guid()), width));
        let _ = writeln!(out);
    }
    let _ = writeln!(out, "{} of {} pins", visible.len(), app.items.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{Category, FeedItem, LoadOutcome};
    use crate::storage::Database;

    fn sample() -> EnrichedItem {
        EnrichedItem::from_feed_item(
            FeedItem {
                guid: "pin-1".into(),
                title: "Core Web Vitals tips".into(),
                link: "https://www.pinterest.com/pin/1/".into(),
                description: "<p>Fix  LCP\n and CLS</p><img src=\"https://i.pinimg.com/1.jpg\">"
                    .into(),
                pub_date: "2024-05-01 12:00:00".into(),
                ..Default::default()
            },
            "https://placeholder",
        )
    }

    #[test]
    fn test_chips_bracket_selection() {
        let chips = render_chips(CategoryFilter::Only(Category::Ppc));
        assert!(chips.starts_with("All  AI SEO"));
        assert!(chips.contains("[PPC]"));
        assert!(!chips.contains("Other"));
    }

    #[test]
    fn test_format_pub_date_variants() {
        assert_eq!(format_pub_date("2024-05-01 12:00:00"), "2024-05-01");
        assert_eq!(format_pub_date("Wed, 01 May 2024 12:00:00 +0000"), "2024-05-01");
        assert_eq!(format_pub_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_card_contents() {
        let card = render_card(&sample(), true, 80);
        assert!(card.starts_with("★ SEO TIPS"));
        assert!(card.contains("2024-05-01"));
        assert!(card.contains("Fix LCP and CLS"));
        assert!(card.contains("image: https://i.pinimg.com/1.jpg"));
        assert!(!card.contains("<p>"));
    }

    #[tokio::test]
    async fn test_gallery_states() {
        let db = Database::open(":memory:").await.unwrap();
        let mut app = App::new(db).await;
        assert!(render_gallery(&app, 80).contains("Fetching"));

        app.apply_outcome(LoadOutcome::Empty);
        let out = render_gallery(&app, 80);
        assert!(out.contains(NO_RESULTS));
        assert!(!out.contains("reset"));

        app.apply_outcome(LoadOutcome::Loaded(vec![sample()]));
        app.set_search_term("zzz");
        let out = render_gallery(&app, 80);
        assert!(out.contains(NO_RESULTS));
        assert!(out.contains("reset all filters"));

        app.reset_filters();
        assert!(render_gallery(&app, 80).contains("1 of 1 pins"));
    }
}
