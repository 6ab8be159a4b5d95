use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Category label assigned to every loaded item.
///
/// The classifier never produces a filter sentinel; "All" lives on
/// [`CategoryFilter`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "AI SEO")]
    AiSeo,
    #[serde(rename = "Local SEO")]
    LocalSeo,
    #[serde(rename = "Backlinks")]
    Backlinks,
    #[serde(rename = "PPC")]
    Ppc,
    #[serde(rename = "Web Design")]
    WebDesign,
    #[serde(rename = "SEO Tips")]
    SeoTips,
    #[serde(rename = "Web Hosting")]
    WebHosting,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    /// Every assignable category, `Other` last.
    pub const ALL: [Category; 8] = [
        Category::AiSeo,
        Category::LocalSeo,
        Category::Backlinks,
        Category::Ppc,
        Category::WebDesign,
        Category::SeoTips,
        Category::WebHosting,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::AiSeo => "AI SEO",
            Category::LocalSeo => "Local SEO",
            Category::Backlinks => "Backlinks",
            Category::Ppc => "PPC",
            Category::WebDesign => "Web Design",
            Category::SeoTips => "SEO Tips",
            Category::WebHosting => "Web Hosting",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Case-insensitive match on the display label; `-` and `_` count as spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_label(s);
        Category::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase() == wanted)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Category selection for the gallery filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Chip bar order: the sentinel first, then the keyword categories.
    /// `Other` is selectable by name but has no chip.
    pub const CHIPS: [CategoryFilter; 8] = [
        CategoryFilter::All,
        CategoryFilter::Only(Category::AiSeo),
        CategoryFilter::Only(Category::LocalSeo),
        CategoryFilter::Only(Category::Backlinks),
        CategoryFilter::Only(Category::Ppc),
        CategoryFilter::Only(Category::WebDesign),
        CategoryFilter::Only(Category::SeoTips),
        CategoryFilter::Only(Category::WebHosting),
    ];

    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(c) => c.label(),
        }
    }

    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => selected == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if normalize_label(s) == "all" {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

fn normalize_label(s: &str) -> String {
    s.trim().to_lowercase().replace(['-', '_'], " ")
}

/// Keyword priority table. The first keyword found in the text decides the
/// category, so entries earlier in this list win over later ones regardless
/// of keyword length. Tests pin this order.
pub const KEYWORDS: &[(&str, Category)] = &[
    ("ai", Category::AiSeo),
    ("local", Category::LocalSeo),
    ("backlink", Category::Backlinks),
    ("link building", Category::Backlinks),
    ("ppc", Category::Ppc),
    ("google ads", Category::Ppc),
    ("design", Category::WebDesign),
    ("ux", Category::WebDesign),
    ("ui", Category::WebDesign),
    ("tips", Category::SeoTips),
    ("guide", Category::SeoTips),
    ("how to", Category::SeoTips),
    ("hosting", Category::WebHosting),
    ("server", Category::WebHosting),
    ("vps", Category::WebHosting),
    ("bluehost", Category::WebHosting),
    ("siteground", Category::WebHosting),
];

/// Detects the category of an item from its title and description.
///
/// Both strings are joined with a single space and lowercased, then
/// [`KEYWORDS`] is scanned in order for a substring hit. Returns
/// [`Category::Other`] when nothing matches.
pub fn classify(title: &str, description: &str) -> Category {
    let text = format!("{} {}", title, description).to_lowercase();

    KEYWORDS
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|&(_, category)| category)
        .unwrap_or(Category::Other)
}
