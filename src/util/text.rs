use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

static TAG_PATTERN: OnceLock<Regex> = OnceLock::new();

fn tag_pattern() -> &'static Regex {
    // An unterminated `<...` at the end of the input counts as a tag too.
    TAG_PATTERN.get_or_init(|| Regex::new(r"<[^>]*>?").expect("tag pattern is valid"))
}

/// Removes every `<...>` span from an HTML fragment.
///
/// This is a lexical scrub, not an HTML parser: entities are left alone and
/// anything between angle brackets disappears, including a trailing `<` with
/// no closing bracket. Search and card rendering both go through here so the
/// text a user can find is the text they see.
///
/// Returns `Cow::Borrowed` when the input has no `<`.
///
/// # Examples
///
/// ```
/// use pinfeed::util::strip_tags;
///
/// assert_eq!(strip_tags("<p>Fast <b>sites</b></p>"), "Fast sites");
/// assert_eq!(strip_tags("plain"), "plain");
/// ```
pub fn strip_tags(html: &str) -> Cow<'_, str> {
    if !html.contains('<') {
        return Cow::Borrowed(html);
    }
    tag_pattern().replace_all(html, "")
}

/// Display width of a string in terminal columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";

/// Cuts `s` so it occupies at most `max_width` columns, ending in `...` when
/// anything was dropped. Widths below 4 leave no room for the ellipsis and
/// return a plain prefix.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let budget = if max_width > ELLIPSIS.len() {
        max_width - ELLIPSIS.len()
    } else {
        max_width
    };

    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }

    if max_width > ELLIPSIS.len() {
        Cow::Owned(format!("{}{}", &s[..end], ELLIPSIS))
    } else {
        Cow::Owned(s[..end].to_string())
    }
}

/// Collapses runs of whitespace (including newlines from HTML source) into
/// single spaces and trims the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
