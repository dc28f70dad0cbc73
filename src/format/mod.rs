//! Documentation format conversion.
//!
//! [`DocFormatter`] turns documentation in any supported [`DocFormat`] into
//! HTML, resolving `` `Name` `` references against the library's keywords,
//! data types and introduction sections. [`to_text`] goes the other way for
//! short docs extracted from HTML.

pub mod robot;
pub mod to_text;

use crate::model::DocFormat;
use crate::text::{html_escape, normalize};
use crate::toc;
use std::collections::HashMap;

pub use to_text::{html_to_plain_text, shortdoc_from_html};

/// Sections every generated page has, with their anchors.
const FIXED_SECTIONS: &[(&str, &str)] = &[
    ("introduction", "Introduction"),
    ("library introduction", "Introduction"),
    ("importing", "Importing"),
    ("library importing", "Importing"),
    ("keywords", "Keywords"),
    ("data types", "Data types"),
];

/// Converts documentation to HTML for one library.
///
/// Built once per library so that every converted doc resolves links against
/// the same targets.
#[derive(Debug, Clone)]
pub struct DocFormatter {
    doc_format: DocFormat,
    /// normalized name → anchor
    targets: HashMap<String, String>,
}

impl DocFormatter {
    pub fn new<'a, K, T>(keywords: K, data_types: T, introduction: &str, doc_format: DocFormat) -> Self
    where
        K: IntoIterator<Item = &'a str>,
        T: IntoIterator<Item = &'a str>,
    {
        let mut targets = HashMap::new();
        for (name, anchor) in FIXED_SECTIONS {
            targets.insert(normalize(name), anchor.to_string());
        }
        if doc_format == DocFormat::Robot {
            for heading in toc::headings(introduction) {
                targets.insert(normalize(&heading), heading);
            }
        }
        for name in data_types {
            targets.insert(normalize(name), format!("type-{}", name));
        }
        for name in keywords {
            targets.insert(normalize(name), name.to_string());
        }
        DocFormatter { doc_format, targets }
    }

    /// Convert `doc` to HTML. `intro` enables heading anchors and is meant
    /// for the library's own documentation only.
    pub fn html(&self, doc: &str, intro: bool) -> String {
        match self.doc_format {
            DocFormat::Html => doc.to_string(),
            DocFormat::Robot => robot::to_html(doc, intro, &|name: &str| self.link(name)),
            DocFormat::Text => preformatted(doc),
            DocFormat::Rest => {
                tracing::warn!("reStructuredText is not supported, rendering as plain text");
                preformatted(doc)
            }
        }
    }

    /// Render a `` `name` `` reference: a link when it names something known.
    fn link(&self, name: &str) -> String {
        match self.targets.get(&normalize(name)) {
            Some(anchor) => format!(
                "<a href=\"#{}\" class=\"name\">{}</a>",
                html_escape(anchor),
                name
            ),
            None => format!("<span class=\"name\">{}</span>", name),
        }
    }
}

fn preformatted(doc: &str) -> String {
    format!("<p style=\"white-space: pre-wrap\">{}</p>", html_escape(doc))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatter(format: DocFormat) -> DocFormatter {
        DocFormatter::new(
            ["Open Browser", "Close All"],
            ["Direction"],
            "= Usage =\nSome text.",
            format,
        )
    }

    #[test]
    fn links_keywords_case_and_space_insensitively() {
        let html = formatter(DocFormat::Robot).html("See `open browser`.", false);
        assert_eq!(
            html,
            "<p>See <a href=\"#Open Browser\" class=\"name\">open browser</a>.</p>"
        );
    }

    #[test]
    fn links_data_types_and_sections() {
        let f = formatter(DocFormat::Robot);
        assert!(f.html("`Direction`", false).contains("href=\"#type-Direction\""));
        assert!(f.html("`Usage`", false).contains("href=\"#Usage\""));
        assert!(f.html("`importing`", false).contains("href=\"#Importing\""));
    }

    #[test]
    fn unknown_names_are_spans() {
        let html = formatter(DocFormat::Robot).html("`Nope`", false);
        assert_eq!(html, "<p><span class=\"name\">Nope</span></p>");
    }

    #[test]
    fn html_passes_through() {
        let doc = "<p>Already <b>html</b></p>";
        assert_eq!(formatter(DocFormat::Html).html(doc, true), doc);
    }

    #[test]
    fn text_is_escaped_and_preformatted() {
        assert_eq!(
            formatter(DocFormat::Text).html("a < b\nc", false),
            "<p style=\"white-space: pre-wrap\">a &lt; b\nc</p>"
        );
    }
}
