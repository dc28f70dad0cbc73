//! A single documented keyword (or library init).

use super::argument::ArgumentDoc;
use super::DocFormat;
use crate::format::shortdoc_from_html;
use crate::tags::Tags;
use crate::text::first_paragraph;
use serde_json::{json, Value};
use std::cell::OnceCell;

/// What a keyword knows about the library that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordParent {
    pub name: String,
    pub doc_format: DocFormat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordDoc {
    pub name: String,
    pub args: Vec<ArgumentDoc>,
    pub doc: String,
    pub tags: Tags,
    pub source: Option<String>,
    /// `-1` when unknown.
    pub lineno: i64,
    shortdoc: OnceCell<String>,
    parent: Option<KeywordParent>,
}

impl KeywordDoc {
    pub fn new(name: impl Into<String>) -> Self {
        KeywordDoc {
            name: name.into(),
            args: Vec::new(),
            doc: String::new(),
            tags: Tags::default(),
            source: None,
            lineno: -1,
            shortdoc: OnceCell::new(),
            parent: None,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn with_args(mut self, args: Vec<ArgumentDoc>) -> Self {
        self.args = args;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Tags::new(tags);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>, lineno: i64) -> Self {
        self.source = Some(source.into());
        self.lineno = lineno;
        self
    }

    /// Use an explicit short doc. An empty one means "derive from `doc`".
    pub fn with_shortdoc(mut self, shortdoc: impl Into<String>) -> Self {
        let shortdoc = shortdoc.into();
        self.shortdoc = if shortdoc.is_empty() {
            OnceCell::new()
        } else {
            OnceCell::from(shortdoc)
        };
        self
    }

    /// One-line summary of `doc`, derived on first access and cached.
    pub fn shortdoc(&self) -> &str {
        self.shortdoc.get_or_init(|| self.derive_shortdoc())
    }

    /// Freeze the short doc so later changes to `doc` do not affect it.
    pub fn generate_shortdoc(&self) {
        self.shortdoc();
    }

    fn derive_shortdoc(&self) -> String {
        let html = self
            .parent
            .as_ref()
            .is_some_and(|p| p.doc_format == DocFormat::Html);
        let doc = if html {
            shortdoc_from_html(&self.doc)
        } else {
            self.doc.clone()
        };
        first_paragraph(&doc).lines().collect::<Vec<_>>().join(" ")
    }

    /// `*DEPRECATED*`, `*DEPRECATED.*` etc. at the start of the doc.
    pub fn deprecated(&self) -> bool {
        self.doc.starts_with("*DEPRECATED") && self.doc[1..].contains('*')
    }

    pub fn sort_key(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn parent(&self) -> Option<&KeywordParent> {
        self.parent.as_ref()
    }

    pub(crate) fn set_parent(&mut self, parent: KeywordParent) {
        self.parent = Some(parent);
    }

    pub fn to_dictionary(&self) -> Value {
        let args: Vec<Value> = self.args.iter().map(ArgumentDoc::to_dictionary).collect();
        json!({
            "name": self.name,
            "args": args,
            "doc": self.doc,
            "shortdoc": self.shortdoc(),
            "tags": self.tags,
            "source": self.source,
            "lineno": self.lineno,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArgKind, ArgType};

    fn parented(kw: KeywordDoc, doc_format: DocFormat) -> KeywordDoc {
        let mut kw = kw;
        kw.set_parent(KeywordParent {
            name: "Lib".to_string(),
            doc_format,
        });
        kw
    }

    #[test]
    fn shortdoc_joins_first_paragraph() {
        let kw = KeywordDoc::new("K").with_doc("First line.\nSecond line.\nThird.");
        assert_eq!(kw.shortdoc(), "First line. Second line. Third.");

        let kw = KeywordDoc::new("K").with_doc("Summary\ncontinues.\n\nDetails.");
        assert_eq!(kw.shortdoc(), "Summary continues.");
    }

    #[test]
    fn shortdoc_from_html_parent() {
        let kw = parented(
            KeywordDoc::new("K").with_doc("<p>Does <b>things</b>\nwell.</p><p>More.</p>"),
            DocFormat::Html,
        );
        assert_eq!(kw.shortdoc(), "Does *things* well.");
    }

    #[test]
    fn explicit_shortdoc_wins() {
        let kw = KeywordDoc::new("K").with_doc("Long doc.").with_shortdoc("Short.");
        assert_eq!(kw.shortdoc(), "Short.");

        let kw = KeywordDoc::new("K").with_doc("Long doc.").with_shortdoc("");
        assert_eq!(kw.shortdoc(), "Long doc.");
    }

    #[test]
    fn last_explicit_shortdoc_wins() {
        let kw = KeywordDoc::new("K").with_shortdoc("First.").with_shortdoc("Second.");
        assert_eq!(kw.shortdoc(), "Second.");

        let kw = KeywordDoc::new("K").with_doc("Long doc.").with_shortdoc("First.").with_shortdoc("");
        assert_eq!(kw.shortdoc(), "Long doc.");
    }

    #[test]
    fn generated_shortdoc_is_frozen() {
        let mut kw = KeywordDoc::new("K").with_doc("Original.");
        kw.generate_shortdoc();
        kw.doc = "Changed.".to_string();
        assert_eq!(kw.shortdoc(), "Original.");
    }

    #[test]
    fn deprecation_detection() {
        let kw = |doc: &str| KeywordDoc::new("K").with_doc(doc);
        assert!(kw("*DEPRECATED* use X instead").deprecated());
        assert!(kw("*DEPRECATED in 4.0.* Gone.").deprecated());
        assert!(!kw("*DEPRECATED").deprecated());
        assert!(!kw("Not deprecated").deprecated());
        assert!(!kw("").deprecated());
    }

    #[test]
    fn dictionary_form() {
        let kw = KeywordDoc::new("Log")
            .with_doc("Logs a message.")
            .with_tags(["b", "A"])
            .with_source("lib.py", 12)
            .with_args(vec![
                ArgumentDoc::new("message", ArgKind::PositionalOrNamed).with_type(ArgType::plain("str")),
            ]);
        assert_eq!(
            kw.to_dictionary(),
            json!({
                "name": "Log",
                "args": [{
                    "name": "message",
                    "type": ["str"],
                    "default": null,
                    "kind": "POSITIONAL_OR_NAMED",
                    "required": true,
                    "repr": "message: str",
                }],
                "doc": "Logs a message.",
                "shortdoc": "Logs a message.",
                "tags": ["A", "b"],
                "source": "lib.py",
                "lineno": 12,
            })
        );
    }

    #[test]
    fn sort_key_is_lowercase_name() {
        assert_eq!(KeywordDoc::new("Open Browser").sort_key(), "open browser");
    }
}
