//! Table of contents for library introductions.
//!
//! A line containing only `%TOC%` in ROBOT-format documentation is replaced
//! by a list of the introduction's top-level headings followed by the
//! sections every generated page has.

use crate::model::DocFormat;
use regex::Regex;
use std::sync::LazyLock;

pub const TOC_MARKER: &str = "%TOC%";

static RE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*=\s+(.+?)\s+=\s*$").unwrap());

/// Top-level `= Heading =` titles of `doc`, in order of appearance.
pub fn headings(doc: &str) -> Vec<String> {
    RE_HEADING
        .captures_iter(doc)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Expand every `%TOC%` line of `doc`. Returns `doc` unchanged when the
/// format is not ROBOT or there is no marker line.
pub fn render_toc(doc_format: DocFormat, doc: &str, has_inits: bool) -> String {
    if doc_format != DocFormat::Robot || !doc.lines().any(is_marker) {
        return doc.to_string();
    }
    let toc = create_toc(doc, has_inits);
    doc.lines()
        .map(|line| if is_marker(line) { toc.as_str() } else { line })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The TOC block itself: one `` - `entry` `` line per entry.
pub fn create_toc(doc: &str, has_inits: bool) -> String {
    let mut entries = headings(doc);
    if has_inits {
        entries.push("Importing".to_string());
    }
    entries.push("Keywords".to_string());
    entries.push("Data types".to_string());
    entries
        .iter()
        .map(|entry| render_toc_item(entry))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_toc_item(entry: &str) -> String {
    format!("- `{}`", entry)
}

fn is_marker(line: &str) -> bool {
    line.trim() == TOC_MARKER
}
