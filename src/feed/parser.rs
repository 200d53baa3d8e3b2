use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::feed::sanitize::{sanitize, sanitize_opt};
use crate::feed::types::{Feed, FeedItem, DEFAULT_FEED_TITLE};

/// Which extraction path a document is routed down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Atom,
    Rss,
}

/// The document lacked a recognizable container for its detected format.
///
/// No partial result accompanies these: a feed with a present container and
/// zero entries is a success, not a `ParseError`.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid Atom document: no <feed> element found")]
    MissingFeed,
    #[error("invalid RSS document: no <channel> element found")]
    MissingChannel,
}

// The <feed> span is greedy (runs to the last closing tag); the rest are
// non-greedy, first-match-wins. <channel>, <entry>, and <item> match the
// bare tag only — no attribute tolerance.
static FEED_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<feed[^>]*>(.*)</feed>").expect("feed regex must compile"));
static CHANNEL_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<channel>(.*?)</channel>").expect("channel regex must compile")
});
static ENTRY_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<entry>(.*?)</entry>").expect("entry regex must compile"));
static ITEM_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<item>(.*?)</item>").expect("item regex must compile"));
static ATOM_LINK_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<link[^>]*href=['"]([^'"]+)['"]"#).expect("link regex must compile")
});

/// Classifies raw document text as Atom or RSS.
///
/// A textual heuristic, not a schema check: Atom iff the text contains a
/// `<feed` opening-tag marker and at least one literal `<entry>` tag.
/// Everything else — including documents that are not feeds at all — falls
/// through to the RSS path and yields however many `<item>` spans it
/// happens to contain.
pub fn detect_format(xml: &str) -> FeedFormat {
    if xml.contains("<feed") && xml.contains("<entry>") {
        FeedFormat::Atom
    } else {
        FeedFormat::Rss
    }
}

/// Normalizes raw feed text into a [`Feed`], routing by [`detect_format`].
///
/// # Errors
///
/// Returns [`ParseError`] when the document lacks the container element for
/// its detected format (`<feed>...</feed>` or `<channel>...</channel>`).
pub fn parse_feed(xml: &str) -> Result<Feed, ParseError> {
    match detect_format(xml) {
        FeedFormat::Atom => parse_atom(xml),
        FeedFormat::Rss => parse_rss(xml),
    }
}

/// Content of the first `<tag ...>...</tag>` pair in `text`, trimmed.
/// Attributes are tolerated on the opening tag.
fn tag_content(tag: &str, text: &str) -> Option<String> {
    let re = Regex::new(&format!(r"(?s)<{tag}[^>]*>(.*?)</{tag}>")).ok()?;
    let caps = re.captures(text)?;
    Some(caps[1].trim().to_string())
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

fn parse_atom(xml: &str) -> Result<Feed, ParseError> {
    let caps = FEED_SPAN.captures(xml).ok_or(ParseError::MissingFeed)?;
    let feed_content = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

    let title = non_empty_or(
        sanitize_opt(tag_content("title", feed_content).as_deref()),
        DEFAULT_FEED_TITLE,
    );
    let description = sanitize_opt(tag_content("subtitle", feed_content).as_deref());

    let mut items = Vec::new();
    for entry in ENTRY_SPAN.captures_iter(feed_content) {
        let entry_content = entry.get(1).map(|m| m.as_str()).unwrap_or_default();

        // Atom links carry the URL in an href attribute, not tag content.
        let link = ATOM_LINK_HREF
            .captures(entry_content)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        // Always populated on this path, even when <content> is missing —
        // unlike RSS item descriptions, which stay absent.
        let description = Some(sanitize_opt(tag_content("content", entry_content).as_deref()));

        items.push(FeedItem {
            title: sanitize_opt(tag_content("title", entry_content).as_deref()),
            link,
            description,
            // An empty <published> defers to <updated>, same as a missing one.
            publication_date: tag_content("published", entry_content)
                .filter(|date| !date.is_empty())
                .or_else(|| tag_content("updated", entry_content)),
            guid: tag_content("id", entry_content),
        });
    }

    Ok(Feed {
        title,
        description,
        items,
    })
}

fn parse_rss(xml: &str) -> Result<Feed, ParseError> {
    let caps = CHANNEL_SPAN.captures(xml).ok_or(ParseError::MissingChannel)?;
    let channel_content = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

    // Channel-level title/description are trimmed but never entity-decoded;
    // item-level titles and descriptions below do decode. Consumers pin
    // this exact shape.
    let title = non_empty_or(
        tag_content("title", channel_content).unwrap_or_default(),
        DEFAULT_FEED_TITLE,
    );
    let description = tag_content("description", channel_content).unwrap_or_default();

    let mut items = Vec::new();
    // Items are scanned over the whole document, not just the channel span.
    for item in ITEM_SPAN.captures_iter(xml) {
        let item_content = item.get(1).map(|m| m.as_str()).unwrap_or_default();

        items.push(FeedItem {
            title: sanitize_opt(tag_content("title", item_content).as_deref()),
            link: tag_content("link", item_content).unwrap_or_default(),
            description: tag_content("description", item_content).map(|d| sanitize(&d)),
            publication_date: tag_content("pubDate", item_content),
            guid: tag_content("guid", item_content),
        });
    }

    Ok(Feed {
        title,
        description,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ========================================================================
    // Format detection
    // ========================================================================

    #[test]
    fn detects_atom_when_both_markers_present() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry></entry></feed>"#;
        assert_eq!(detect_format(xml), FeedFormat::Atom);
    }

    #[test]
    fn feed_marker_without_entries_routes_to_rss() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"></feed>"#;
        assert_eq!(detect_format(xml), FeedFormat::Rss);
    }

    #[test]
    fn entries_without_feed_marker_route_to_rss() {
        let xml = "<rss><channel><entry>odd</entry></channel></rss>";
        assert_eq!(detect_format(xml), FeedFormat::Rss);
    }

    #[test]
    fn irrelevant_channel_tag_does_not_override_atom() {
        let xml = "<feed><entry><title>T</title></entry></feed><channel></channel>";
        assert_eq!(detect_format(xml), FeedFormat::Atom);
        let feed = parse_feed(xml).unwrap();
        assert_eq!(feed.items.len(), 1);
    }

    #[test]
    fn unrecognized_documents_fall_through_to_rss() {
        assert_eq!(detect_format("not xml at all"), FeedFormat::Rss);
    }

    // ========================================================================
    // Atom extraction
    // ========================================================================

    const ATOM_DOC: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Geek &amp; News</title>
  <subtitle>Daily &quot;developer&quot; links</subtitle>
  <entry>
    <title>First &amp; foremost</title>
    <link rel="alternate" href="https://x.test/a"/>
    <content type="html">&lt;p&gt;Body one&lt;/p&gt;</content>
    <published>2025-01-02T03:04:05Z</published>
    <updated>2025-01-03T00:00:00Z</updated>
    <id>tag:x.test,2025:a</id>
  </entry>
  <entry>
    <title>Second</title>
    <updated>2025-01-04T00:00:00Z</updated>
  </entry>
</feed>"#;

    #[test]
    fn atom_feed_level_fields_are_decoded() {
        let feed = parse_feed(ATOM_DOC).unwrap();
        assert_eq!(feed.title, "Geek & News");
        assert_eq!(feed.description, "Daily \"developer\" links");
    }

    #[test]
    fn atom_link_comes_from_href_attribute() {
        let feed = parse_feed(ATOM_DOC).unwrap();
        assert_eq!(feed.items[0].link, "https://x.test/a");
    }

    #[test]
    fn atom_entry_without_link_gets_empty_string() {
        let feed = parse_feed(ATOM_DOC).unwrap();
        assert_eq!(feed.items[1].link, "");
    }

    #[test]
    fn atom_content_is_decoded_and_always_present() {
        let feed = parse_feed(ATOM_DOC).unwrap();
        assert_eq!(feed.items[0].description.as_deref(), Some("Body one"));
        // Missing <content> still yields a description, just an empty one.
        assert_eq!(feed.items[1].description.as_deref(), Some(""));
    }

    #[test]
    fn atom_published_wins_over_updated() {
        let feed = parse_feed(ATOM_DOC).unwrap();
        assert_eq!(
            feed.items[0].publication_date.as_deref(),
            Some("2025-01-02T03:04:05Z")
        );
    }

    #[test]
    fn atom_falls_back_to_updated_when_published_missing() {
        let feed = parse_feed(ATOM_DOC).unwrap();
        assert_eq!(
            feed.items[1].publication_date.as_deref(),
            Some("2025-01-04T00:00:00Z")
        );
    }

    #[test]
    fn atom_empty_published_defers_to_updated() {
        let xml = "<feed><entry>\
                   <published></published>\
                   <updated>2025-01-05T00:00:00Z</updated>\
                   </entry></feed>";
        let feed = parse_feed(xml).unwrap();
        assert_eq!(
            feed.items[0].publication_date.as_deref(),
            Some("2025-01-05T00:00:00Z")
        );
    }

    #[test]
    fn atom_guid_comes_from_id_tag() {
        let feed = parse_feed(ATOM_DOC).unwrap();
        assert_eq!(feed.items[0].guid.as_deref(), Some("tag:x.test,2025:a"));
        assert_eq!(feed.items[1].guid, None);
    }

    #[test]
    fn atom_entry_titles_are_decoded() {
        let feed = parse_feed(ATOM_DOC).unwrap();
        assert_eq!(feed.items[0].title, "First & foremost");
    }

    #[test]
    fn atom_missing_feed_title_falls_back() {
        // The entry carries no <title> either, so the feed-level lookup
        // (first <title> pair anywhere in the span) finds nothing.
        let xml = "<feed><entry><id>x</id></entry></feed>";
        let feed = parse_feed(xml).unwrap();
        assert_eq!(feed.title, "GeekNews");
        assert_eq!(feed.description, "");
    }

    #[test]
    fn atom_feed_title_lookup_is_first_match_in_span() {
        // A feed with no top-level <title> picks up the first entry's —
        // the lookup is positional, not structural.
        let xml = "<feed><entry><title>Entry title</title></entry></feed>";
        let feed = parse_feed(xml).unwrap();
        assert_eq!(feed.title, "Entry title");
    }

    #[test]
    fn atom_empty_feed_title_falls_back() {
        let xml = "<feed><title>  </title><entry><title>T</title></entry></feed>";
        let feed = parse_feed(xml).unwrap();
        assert_eq!(feed.title, "GeekNews");
    }

    #[test]
    fn atom_without_closing_feed_tag_is_malformed() {
        let xml = "<feed><entry><title>T</title></entry>";
        let err = parse_feed(xml).unwrap_err();
        assert!(matches!(err, ParseError::MissingFeed));
    }

    #[test]
    fn atom_empty_feed_is_a_success() {
        // Routed down the RSS path (no <entry> marker), so this exercises
        // the empty Atom container via the explicit parser instead.
        let feed = parse_atom("<feed><title>Empty</title></feed>").unwrap();
        assert_eq!(feed.title, "Empty");
        assert!(feed.items.is_empty());
    }

    // ========================================================================
    // RSS extraction
    // ========================================================================

    const RSS_DOC: &str = r#"<?xml version="1.0"?>
<rss version="2.0">
<channel>
  <title>Geek &amp; News</title>
  <description>Daily links</description>
  <item>
    <title>First &amp; foremost</title>
    <link>https://x.test/b</link>
    <description><![CDATA[Body <b>one</b> &amp; more]]></description>
    <pubDate>Tue, 07 Jan 2025 09:00:00 +0900</pubDate>
    <guid>https://x.test/b</guid>
  </item>
  <item>
    <title>Second</title>
  </item>
</channel>
</rss>"#;

    #[test]
    fn rss_channel_fields_are_not_decoded() {
        let feed = parse_feed(RSS_DOC).unwrap();
        // Channel-level text keeps its entities; only item fields decode.
        assert_eq!(feed.title, "Geek &amp; News");
        assert_eq!(feed.description, "Daily links");
    }

    #[test]
    fn rss_item_titles_are_decoded() {
        let feed = parse_feed(RSS_DOC).unwrap();
        assert_eq!(feed.items[0].title, "First & foremost");
    }

    #[test]
    fn rss_link_comes_from_tag_content() {
        let feed = parse_feed(RSS_DOC).unwrap();
        assert_eq!(feed.items[0].link, "https://x.test/b");
        assert_eq!(feed.items[1].link, "");
    }

    #[test]
    fn rss_description_unwraps_cdata_and_strips_markup() {
        let feed = parse_feed(RSS_DOC).unwrap();
        assert_eq!(
            feed.items[0].description.as_deref(),
            Some("Body one & more")
        );
    }

    #[test]
    fn rss_description_is_absent_when_tag_missing() {
        let feed = parse_feed(RSS_DOC).unwrap();
        assert_eq!(feed.items[1].description, None);
    }

    #[test]
    fn rss_pubdate_and_guid_stay_raw() {
        let feed = parse_feed(RSS_DOC).unwrap();
        assert_eq!(
            feed.items[0].publication_date.as_deref(),
            Some("Tue, 07 Jan 2025 09:00:00 +0900")
        );
        assert_eq!(feed.items[0].guid.as_deref(), Some("https://x.test/b"));
        assert_eq!(feed.items[1].publication_date, None);
        assert_eq!(feed.items[1].guid, None);
    }

    #[test]
    fn rss_items_outside_channel_span_are_still_extracted() {
        let xml = "<rss><channel><title>T</title></channel>\
                   <item><title>Stray</title></item></rss>";
        let feed = parse_feed(xml).unwrap();
        assert_eq!(feed.items.len(), 1);
        assert_eq!(feed.items[0].title, "Stray");
    }

    #[test]
    fn rss_missing_channel_is_malformed() {
        let xml = "<rss><item><title>T</title></item></rss>";
        let err = parse_feed(xml).unwrap_err();
        assert!(matches!(err, ParseError::MissingChannel));
    }

    #[test]
    fn rss_empty_channel_is_a_success() {
        let feed = parse_feed("<rss><channel></channel></rss>").unwrap();
        assert_eq!(feed.title, "GeekNews");
        assert_eq!(feed.description, "");
        assert!(feed.items.is_empty());
    }

    #[test]
    fn rss_empty_channel_title_falls_back() {
        let feed = parse_feed("<rss><channel><title></title></channel></rss>").unwrap();
        assert_eq!(feed.title, "GeekNews");
    }

    // ========================================================================
    // Ordering
    // ========================================================================

    #[test]
    fn rss_items_keep_document_order() {
        let xml = "<rss><channel>\
                   <item><title>E1</title></item>\
                   <item><title>E2</title></item>\
                   <item><title>E3</title></item>\
                   </channel></rss>";
        let feed = parse_feed(xml).unwrap();
        let titles: Vec<&str> = feed.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["E1", "E2", "E3"]);
    }

    #[test]
    fn atom_entries_keep_document_order() {
        let xml = "<feed>\
                   <entry><title>E1</title></entry>\
                   <entry><title>E2</title></entry>\
                   <entry><title>E3</title></entry>\
                   </feed>";
        let feed = parse_feed(xml).unwrap();
        let titles: Vec<&str> = feed.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["E1", "E2", "E3"]);
    }
}
