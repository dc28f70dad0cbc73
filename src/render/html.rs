//! HTML renderer producing a standalone HTML page with semantic markup.
//!
//! Docs are converted to HTML on a copy of the library, so rendering never
//! changes the caller's model. The page also embeds the model as JSON
//! (`libdoc = {...};`) for scripts that want to build their own views.

use crate::error::Result;
use crate::model::*;
use crate::render::Renderer;
use crate::text::html_escape;

pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, lib: &LibraryDoc) -> Result<String> {
        let mut lib = lib.clone();
        lib.convert_docs_to_html();
        let generated = chrono::Local::now().naive_local();
        let model = lib.to_json_at(None, generated)?;
        let mut out = String::new();

        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        out.push_str(&format!("<title>{}</title>\n", html_escape(&lib.name)));
        out.push_str("<style>\n");
        out.push_str("body { font-family: system-ui, sans-serif; max-width: 56em; margin: 2em auto; padding: 0 1em; }\n");
        out.push_str("code, .args { font-family: monospace; }\n");
        out.push_str("pre { background: #f4f4f4; padding: 1em; border-radius: 5px; overflow-x: auto; }\n");
        out.push_str(".name { font-weight: bold; }\n");
        out.push_str(".tag { display: inline-block; font-size: 0.75em; padding: 0.1em 0.4em; border-radius: 3px; margin-right: 0.3em; background: #e0e0e0; }\n");
        out.push_str(".deprecated { text-decoration: line-through; color: #888; }\n");
        out.push_str(".meta { color: #555; }\n");
        out.push_str("</style>\n");
        out.push_str("</head>\n<body>\n");

        // Header
        out.push_str(&format!("<h1>{}</h1>\n", html_escape(&lib.name)));
        out.push_str("<p class=\"meta\">");
        if !lib.version.is_empty() {
            out.push_str(&format!("Version: {}<br>\n", html_escape(&lib.version)));
        }
        out.push_str(&format!("Scope: {}", lib.scope));
        out.push_str("</p>\n");

        // Introduction
        out.push_str("<h2 id=\"Introduction\">Introduction</h2>\n");
        out.push_str(lib.raw_doc());
        out.push('\n');

        // Importing
        if !lib.inits().is_empty() {
            out.push_str("<h2 id=\"Importing\">Importing</h2>\n");
            for init in lib.inits() {
                out.push_str(&render_keyword_html(init, false));
            }
        }

        // Keywords
        out.push_str("<h2 id=\"Keywords\">Keywords</h2>\n");
        if !lib.keywords().is_empty() {
            out.push_str("<ul>\n");
            for kw in lib.keywords() {
                let class = if kw.deprecated() { " class=\"deprecated\"" } else { "" };
                out.push_str(&format!(
                    "  <li{}><a href=\"#{}\">{}</a></li>\n",
                    class,
                    html_escape(&kw.name),
                    html_escape(&kw.name)
                ));
            }
            out.push_str("</ul>\n");
        }
        for kw in lib.keywords() {
            out.push_str(&render_keyword_html(kw, true));
        }

        // Data types. The heading is a TOC target even without any types.
        out.push_str("<h2 id=\"Data types\">Data types</h2>\n");
        for data_type in lib.sorted_data_types() {
            out.push_str(&render_data_type_html(data_type));
        }

        out.push_str(&format!(
            "<p class=\"meta\">Generated {}</p>\n",
            generated.format(TIMESTAMP_FORMAT)
        ));
        out.push_str(&format!(
            "<script type=\"text/javascript\">\nlibdoc = {};\n</script>\n",
            model.replace("</", "<\\/")
        ));
        out.push_str("</body>\n</html>\n");
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "html"
    }
}

fn render_keyword_html(kw: &KeywordDoc, with_anchor: bool) -> String {
    let mut out = String::new();
    let name = html_escape(&kw.name);

    if with_anchor {
        out.push_str(&format!("<h3 id=\"{}\">{}</h3>\n", name, name));
    } else {
        out.push_str(&format!("<h3>{}</h3>\n", name));
    }

    // Arguments
    if !kw.args.is_empty() {
        out.push_str("<h4>Arguments</h4>\n<ul class=\"args\">\n");
        for arg in &kw.args {
            out.push_str(&format!("  <li>{}</li>\n", html_escape(&arg.to_string())));
        }
        out.push_str("</ul>\n");
    }

    // Tags
    if !kw.tags.is_empty() {
        out.push_str("<p>");
        for tag in kw.tags.iter() {
            out.push_str(&format!("<span class=\"tag\">{}</span>", html_escape(tag)));
        }
        out.push_str("</p>\n");
    }

    // Documentation
    if !kw.doc.is_empty() {
        out.push_str(&kw.doc);
        out.push('\n');
    }

    if let Some(ref source) = kw.source {
        out.push_str(&format!(
            "<p class=\"meta\">Source: {}{}</p>\n",
            html_escape(source),
            if kw.lineno > 0 { format!(":{}", kw.lineno) } else { String::new() }
        ));
    }

    out
}

fn render_data_type_html(data_type: &DataType) -> String {
    let mut out = String::new();
    let name = html_escape(data_type.name());

    out.push_str(&format!(
        "<h3 id=\"type-{}\">{} <span class=\"tag\">{}</span></h3>\n",
        name,
        name,
        data_type.super_name()
    ));
    if !data_type.doc().is_empty() {
        out.push_str(data_type.doc());
        out.push('\n');
    }

    match data_type {
        DataType::Enum(e) => {
            out.push_str("<h4>Allowed values</h4>\n<ul>\n");
            for member in &e.members {
                out.push_str(&format!(
                    "  <li><code>{}</code> ({})</li>\n",
                    html_escape(&member.name),
                    html_escape(&member.value)
                ));
            }
            out.push_str("</ul>\n");
        }
        DataType::TypedDict(t) => {
            out.push_str("<h4>Items</h4>\n<ul>\n");
            for (key, value) in &t.items {
                let optional = if t.optional_keys.contains(key) { " (optional)" } else { "" };
                out.push_str(&format!(
                    "  <li><code>{}</code>: {}{}</li>\n",
                    html_escape(key),
                    html_escape(value),
                    optional
                ));
            }
            out.push_str("</ul>\n");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn library() -> LibraryDoc {
        let mut lib = LibraryDoc::new("Web <Lib>")
            .with_version("1.0")
            .with_doc("Drives a browser.\n\n%TOC%");
        let browser = NativeType::Enum(NativeEnum {
            name: "Browser".to_string(),
            doc: Some("Supported *browsers*.".to_string()),
            members: vec![("CHROME".to_string(), json!("chrome"))],
        });
        lib.set_inits(vec![KeywordDoc::new("Init").with_doc("Starts.")])
            .unwrap();
        lib.set_keywords(vec![
            KeywordDoc::new("Open")
                .with_doc("Opens `Close`.")
                .with_args(vec![
                    ArgumentDoc::new("browser", ArgKind::PositionalOrNamed)
                        .with_type(ArgType::native(browser))
                        .with_default("CHROME"),
                ])
                .with_tags(["nav"]),
            KeywordDoc::new("Close").with_doc("*DEPRECATED* Do not use."),
        ])
        .unwrap();
        lib
    }

    #[test]
    fn renders_standalone_page() {
        let out = HtmlRenderer.render(&library()).unwrap();
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("<title>Web &lt;Lib&gt;</title>"));
        assert!(out.contains("<h2 id=\"Importing\">Importing</h2>"));
        assert!(out.contains("<h3 id=\"Open\">Open</h3>"));
        assert!(out.contains("<li>browser: Browser = CHROME</li>"));
        assert!(out.contains("<span class=\"tag\">nav</span>"));
        assert!(out.contains("<li class=\"deprecated\"><a href=\"#Close\">Close</a></li>"));
    }

    #[test]
    fn converts_docs_and_links_keywords() {
        let out = HtmlRenderer.render(&library()).unwrap();
        assert!(out.contains("<p>Opens <a href=\"#Close\" class=\"name\">Close</a>.</p>"));
        assert!(out.contains("<a href=\"#Importing\" class=\"name\">Importing</a>"));
        assert!(out.contains("<h3 id=\"type-Browser\">Browser <span class=\"tag\">Enum</span></h3>"));
        assert!(out.contains("<p>Supported <b>browsers</b>.</p>"));
        assert!(out.contains("<li><code>CHROME</code> (chrome)</li>"));
    }

    #[test]
    fn toc_sections_always_have_anchors() {
        let mut lib = LibraryDoc::new("Plain").with_doc("%TOC%");
        lib.set_keywords(vec![KeywordDoc::new("Only")]).unwrap();
        let out = HtmlRenderer.render(&lib).unwrap();
        assert!(out.contains("<a href=\"#Data types\" class=\"name\">Data types</a>"));
        assert!(out.contains("<h2 id=\"Data types\">Data types</h2>"));
        assert!(out.contains("<h2 id=\"Keywords\">Keywords</h2>"));
    }

    #[test]
    fn type_with_several_display_names_has_one_anchor() {
        let mut lib = LibraryDoc::new("L");
        let browser = || NativeType::Enum(NativeEnum {
            name: "Browser".to_string(),
            doc: None,
            members: vec![],
        });
        lib.set_keywords(vec![
            KeywordDoc::new("A").with_args(vec![ArgumentDoc::new("b", ArgKind::PositionalOrNamed)
                .with_type(ArgType::new("Browser", TypeRef::Native(browser())))]),
            KeywordDoc::new("B").with_args(vec![ArgumentDoc::new("b", ArgKind::PositionalOrNamed)
                .with_type(ArgType::new("Engine", TypeRef::Native(browser())))]),
        ])
        .unwrap();
        let out = HtmlRenderer.render(&lib).unwrap();
        assert_eq!(out.matches("id=\"type-Browser\"").count(), 1);
    }

    #[test]
    fn footer_matches_embedded_timestamp() {
        let out = HtmlRenderer.render(&library()).unwrap();
        let footer = out
            .split("<p class=\"meta\">Generated ")
            .nth(1)
            .and_then(|rest| rest.split("</p>").next())
            .unwrap();
        let embedded = out
            .split("\"generated\":\"")
            .nth(1)
            .and_then(|rest| rest.split('"').next())
            .unwrap();
        assert_eq!(footer, embedded);
    }

    #[test]
    fn embeds_model_and_leaves_input_untouched() {
        let lib = library();
        let out = HtmlRenderer.render(&lib).unwrap();
        assert!(out.contains("libdoc = {\"name\":\"Web <Lib>\""));
        assert!(out.contains("\"doc_format\":\"HTML\""));
        assert_eq!(lib.doc_format(), DocFormat::Robot);
        assert_eq!(lib.keywords()[0].doc, "*DEPRECATED* Do not use.");
    }
}
