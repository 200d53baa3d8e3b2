use std::sync::LazyLock;

use regex::Regex;

static CDATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").expect("CDATA regex must compile"));
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag regex must compile"));

/// Normalizes an extracted text field to tag-free plain text.
///
/// Applied exactly once per field, in a fixed order where each step's
/// output can expose patterns the next step consumes:
///
/// 1. The five named entities become their literal characters. `&amp;`
///    decodes after `&lt;`/`&gt;` so a doubly-escaped entity does not
///    un-escape twice in one pass.
/// 2. `<![CDATA[...]]>` wrappers are replaced by their inner content.
/// 3. Remaining `<...>` tags are stripped entirely — including tags that
///    step 1 just decoded into existence.
/// 4. Surrounding whitespace is trimmed.
pub fn sanitize(text: &str) -> String {
    let decoded = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    let unwrapped = CDATA.replace_all(&decoded, "$1");
    let stripped = TAG.replace_all(&unwrapped, "");
    stripped.trim().to_string()
}

/// [`sanitize`] lifted over optional input: absent text yields an empty
/// string, never a failure.
pub fn sanitize_opt(text: Option<&str>) -> String {
    text.map(sanitize).unwrap_or_default()
}
