use serde::Serialize;

/// Fallback feed title used when the source document carries none.
pub const DEFAULT_FEED_TITLE: &str = "GeekNews";

/// One syndicated entry, normalized to tag-free plain text.
///
/// Every `String` field has been entity-decoded and stripped of markup
/// exactly once. `publication_date` is whatever date-like string the source
/// supplied, trimmed but never reformatted or validated; `guid` is opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    /// Entry headline. Empty string when the source omits the tag.
    pub title: String,
    /// Entry URL. Empty string when absent, never `None`.
    pub link: String,
    /// Plain-text summary/content. `None` only on the RSS path when the
    /// source supplies no description tag; Atom entries always carry one
    /// (possibly empty).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw source date string (`<published>`/`<updated>` or `<pubDate>`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    /// Source-supplied unique identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
}

/// The channel-level wrapper around a fetch's worth of items.
///
/// Built fresh on every pipeline invocation and owned by the caller; the
/// pipeline keeps no reference and never mutates it afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    /// Channel/feed title, falling back to [`DEFAULT_FEED_TITLE`].
    pub title: String,
    /// Channel/feed description; empty string when omitted.
    pub description: String,
    /// Items in source document order; may be empty.
    pub items: Vec<FeedItem>,
}
