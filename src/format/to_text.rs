//! HTML → plain text, for short docs of libraries documented in HTML.

use crate::text::html_unescape;
use regex::Regex;
use std::sync::LazyLock;

static RE_FIRST_PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<p(?:\s[^>]*)?>(.*?)</?p>").unwrap());

static RE_BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?(?:b|strong)>").unwrap());

static RE_ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?(?:i|em)>").unwrap());

static RE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?code>").unwrap());

static RE_ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Plain-text version of the first `<p>` of `html`, or of the whole text
/// when it has no paragraphs.
pub fn shortdoc_from_html(html: &str) -> String {
    let body = RE_FIRST_PARAGRAPH
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map_or(html, |m| m.as_str());
    html_to_plain_text(body)
}

/// Map basic inline tags back to Robot markup and drop everything else.
pub fn html_to_plain_text(html: &str) -> String {
    let text = RE_BOLD.replace_all(html, "*");
    let text = RE_ITALIC.replace_all(&text, "_");
    let text = RE_CODE.replace_all(&text, "``");
    let text = RE_ANY_TAG.replace_all(&text, "");
    html_unescape(&text)
}
