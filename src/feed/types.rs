use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};

use super::classifier::{classify, Category};
use super::thumbnail::resolve_thumbnail;

// ============================================================================
// Proxy Response
// ============================================================================

/// Body returned by the RSS-to-JSON proxy.
///
/// Only `items` drives the gallery. `status` and `message` are checked so a
/// proxy-side error payload is not mistaken for an empty feed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedResponse {
    pub status: Option<String>,
    pub message: Option<String>,
    pub feed: Option<FeedMeta>,
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<FeedItem>,
}

impl FeedResponse {
    /// Error message when the proxy reports `status: "error"`.
    pub fn upstream_error(&self) -> Option<&str> {
        match self.status.as_deref() {
            Some(status) if status.eq_ignore_ascii_case("error") => {
                Some(self.message.as_deref().unwrap_or("unspecified proxy error"))
            }
            _ => None,
        }
    }
}

/// Channel metadata echoed by the proxy.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedMeta {
    pub url: String,
    pub title: String,
    pub link: String,
    pub author: String,
    pub description: String,
    pub image: String,
}

// ============================================================================
// Feed Items
// ============================================================================

/// Media attachment of a feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enclosure {
    pub link: String,
    #[serde(rename = "type", default)]
    pub mime_type: String,
}

/// One entry of the upstream feed, before enrichment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedItem {
    #[serde(deserialize_with = "null_as_default")]
    pub guid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub link: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "pubDate", deserialize_with = "null_as_default")]
    pub pub_date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(
        deserialize_with = "non_empty_string",
        skip_serializing
    )]
    pub thumbnail: Option<String>,
    #[serde(deserialize_with = "lenient_enclosure", skip_serializing_if = "Option::is_none")]
    pub enclosure: Option<Enclosure>,
    #[serde(deserialize_with = "non_empty_string", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
}

impl FeedItem {
    /// Upstream guid, or a SHA-256 over `link|title|pubDate` when the feed
    /// left it blank. Bookmarks key on this value so it must not change
    /// between loads of the same entry.
    pub fn stable_guid(&self) -> String {
        let trimmed = self.guid.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }

        let input = format!("{}|{}|{}", self.link, self.title, self.pub_date);
        format!("{:x}", Sha256::digest(input.as_bytes()))
    }
}

/// A feed item plus the fields derived at load time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedItem {
    #[serde(flatten)]
    pub item: FeedItem,
    /// Resolved display image, never empty.
    pub thumbnail: String,
    pub detected_category: Category,
}

impl EnrichedItem {
    /// Pure: the same raw item and placeholder always produce the same result.
    pub fn from_feed_item(mut item: FeedItem, placeholder: &str) -> Self {
        item.guid = item.stable_guid();
        let thumbnail = resolve_thumbnail(&item, placeholder);
        let detected_category = classify(&item.title, &item.description);
        Self {
            item,
            thumbnail,
            detected_category,
        }
    }

    pub fn guid(&self) -> &str {
        &self.item.guid
    }

    pub fn title(&self) -> &str {
        &self.item.title
    }

    pub fn description(&self) -> &str {
        &self.item.description
    }

    pub fn link(&self) -> &str {
        &self.item.link
    }
}

// ============================================================================
// Lenient Field Decoding
// ============================================================================

/// An explicit `null` decodes like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Empty strings and nulls both mean "absent".
fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// The proxy emits `{}` or `[]` for entries without media; both decode to
/// `None`, as does an object whose `link` is missing or empty.
fn lenient_enclosure<'de, D>(deserializer: D) -> Result<Option<Enclosure>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Object(map) = value else {
        return Ok(None);
    };

    let link = match map.get("link").and_then(|v| v.as_str()) {
        Some(link) if !link.trim().is_empty() => link.to_string(),
        _ => return Ok(None),
    };
    let mime_type = map
        .get("type")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    Ok(Some(Enclosure { link, mime_type }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode_item(json: &str) -> FeedItem {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_decode_full_item() {
        let item = decode_item(
            r#"{
                "guid": "https://www.pinterest.com/pin/1/",
                "title": "Local SEO checklist",
                "link": "https://www.pinterest.com/pin/1/",
                "description": "<img src=\"https://i.pinimg.com/1.jpg\">",
                "pubDate": "2024-05-01 12:00:00",
                "author": "webseotrends",
                "thumbnail": "",
                "enclosure": {"link": "https://i.pinimg.com/e.jpg", "type": "image/jpeg"},
                "categories": ["seo"]
            }"#,
        );
        assert_eq!(item.pub_date, "2024-05-01 12:00:00");
        assert_eq!(item.thumbnail, None);
        assert_eq!(
            item.enclosure,
            Some(Enclosure {
                link: "https://i.pinimg.com/e.jpg".into(),
                mime_type: "image/jpeg".into(),
            })
        );
        assert_eq!(item.categories, vec!["seo".to_string()]);
    }

    #[test]
    fn test_decode_missing_fields_default() {
        let item = decode_item(r#"{"guid": "g"}"#);
        assert_eq!(item.title, "");
        assert_eq!(item.enclosure, None);
        assert!(item.categories.is_empty());
    }

    #[test]
    fn test_enclosure_placeholders_are_none() {
        assert_eq!(decode_item(r#"{"enclosure": {}}"#).enclosure, None);
        assert_eq!(decode_item(r#"{"enclosure": []}"#).enclosure, None);
        assert_eq!(decode_item(r#"{"enclosure": null}"#).enclosure, None);
        assert_eq!(decode_item(r#"{"enclosure": {"link": ""}}"#).enclosure, None);
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let resp: FeedResponse = serde_json::from_str(
            r#"{"items":[
                {"guid":"a","title":null,"description":null,"link":null,
                 "pubDate":null,"author":null,"categories":null},
                {"guid":"b","title":"Local SEO audit"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(resp.items.len(), 2);
        assert_eq!(resp.items[0].title, "");
        assert_eq!(resp.items[0].description, "");
        assert_eq!(resp.items[0].pub_date, "");
        assert!(resp.items[0].categories.is_empty());
        assert_eq!(resp.items[1].title, "Local SEO audit");
    }

    #[test]
    fn test_null_items_is_empty() {
        let resp: FeedResponse = serde_json::from_str(r#"{"items":null}"#).unwrap();
        assert!(resp.items.is_empty());
    }

    #[test]
    fn test_null_guid_falls_back_to_hash() {
        let item = decode_item(r#"{"guid":null,"link":"https://www.pinterest.com/pin/9/"}"#);
        assert_eq!(item.guid, "");
        assert_eq!(item.stable_guid().len(), 64);
    }

    #[test]
    fn test_response_without_items_is_empty() {
        let resp: FeedResponse = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert!(resp.items.is_empty());
        assert_eq!(resp.upstream_error(), None);
    }

    #[test]
    fn test_response_error_status() {
        let resp: FeedResponse =
            serde_json::from_str(r#"{"status": "error", "message": "rss_url is invalid"}"#)
                .unwrap();
        assert_eq!(resp.upstream_error(), Some("rss_url is invalid"));
    }

    #[test]
    fn test_stable_guid_prefers_upstream() {
        let item = FeedItem {
            guid: "  abc  ".into(),
            ..Default::default()
        };
        assert_eq!(item.stable_guid(), "abc");
    }

    #[test]
    fn test_stable_guid_hash_is_deterministic() {
        let item = FeedItem {
            link: "https://example.com/pin".into(),
            title: "Pin".into(),
            ..Default::default()
        };
        let a = item.stable_guid();
        assert_eq!(a.len(), 64);
        assert_eq!(a, item.clone().stable_guid());
    }

    #[test]
    fn test_enrich_is_pure() {
        let item = FeedItem {
            guid: "g1".into(),
            title: "Hosting deals".into(),
            ..Default::default()
        };
        let a = EnrichedItem::from_feed_item(item.clone(), "https://placeholder");
        let b = EnrichedItem::from_feed_item(item, "https://placeholder");
        assert_eq!(a, b);
        assert_eq!(a.detected_category, Category::WebHosting);
        assert_eq!(a.thumbnail, "https://placeholder");
    }

    #[test]
    fn test_enriched_serializes_resolved_thumbnail_once() {
        let item = FeedItem {
            guid: "g1".into(),
            thumbnail: Some("https://raw".into()),
            ..Default::default()
        };
        let enriched = EnrichedItem::from_feed_item(item, "https://placeholder");
        let value = serde_json::to_value(&enriched).unwrap();
        assert_eq!(value["thumbnail"], "https://raw");
        assert_eq!(value["detectedCategory"], "Other");
        assert_eq!(value["guid"], "g1");
    }
}
