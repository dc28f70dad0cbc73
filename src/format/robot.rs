//! Robot Framework documentation syntax → HTML.
//!
//! Supported block syntax: `= Heading =` (up to three levels), `- ` list
//! items, `| ` preformatted lines and blank-line separated paragraphs.
//! Inline: `*bold*`, `_italic_`, ``` ``code`` ```, bare URLs and
//! `` `Name` `` references.

use crate::text::html_escape;
use regex::Regex;
use std::sync::LazyLock;

static RE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(={1,3})\s+(.+?)\s+(={1,3})\s*$").unwrap());

static RE_LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-\s+(.*)$").unwrap());

static RE_PREFORMATTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\|(?:\s(.*))?$").unwrap());

// Segments that must not get emphasis or name formatting.
static RE_VERBATIM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"``(.+?)``|https?://\S+").unwrap());

static RE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

enum Block {
    Paragraph(Vec<String>),
    List(Vec<String>),
    Preformatted(Vec<String>),
}

/// Convert Robot-format documentation to HTML. `link` renders a
/// `` `name` `` reference; it receives already escaped text.
pub fn to_html(doc: &str, intro: bool, link: &dyn Fn(&str) -> String) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut current: Option<Block> = None;

    for line in doc.lines() {
        if line.trim().is_empty() {
            flush(&mut current, &mut out, link);
            continue;
        }

        if let Some(caps) = RE_HEADING.captures(line) {
            if caps[1].len() == caps[3].len() {
                flush(&mut current, &mut out, link);
                let level = caps[1].len() + 1;
                let text = html_escape(&caps[2]);
                if intro {
                    out.push(format!("<h{level} id=\"{text}\">{text}</h{level}>"));
                } else {
                    out.push(format!("<h{level}>{text}</h{level}>"));
                }
                continue;
            }
        }

        if let Some(caps) = RE_LIST_ITEM.captures(line) {
            let item = caps[1].to_string();
            match current {
                Some(Block::List(ref mut items)) => items.push(item),
                _ => {
                    flush(&mut current, &mut out, link);
                    current = Some(Block::List(vec![item]));
                }
            }
            continue;
        }

        if let Some(caps) = RE_PREFORMATTED.captures(line) {
            let text = caps.get(1).map_or("", |m| m.as_str()).to_string();
            match current {
                Some(Block::Preformatted(ref mut lines)) => lines.push(text),
                _ => {
                    flush(&mut current, &mut out, link);
                    current = Some(Block::Preformatted(vec![text]));
                }
            }
            continue;
        }

        match current {
            Some(Block::Paragraph(ref mut lines)) => lines.push(line.trim().to_string()),
            _ => {
                flush(&mut current, &mut out, link);
                current = Some(Block::Paragraph(vec![line.trim().to_string()]));
            }
        }
    }

    flush(&mut current, &mut out, link);
    out.join("\n")
}

fn flush(current: &mut Option<Block>, out: &mut Vec<String>, link: &dyn Fn(&str) -> String) {
    let Some(block) = current.take() else {
        return;
    };
    match block {
        Block::Paragraph(lines) => {
            out.push(format!("<p>{}</p>", inline(&lines.join("\n"), link)));
        }
        Block::List(items) => {
            out.push("<ul>".to_string());
            for item in items {
                out.push(format!("<li>{}</li>", inline(&item, link)));
            }
            out.push("</ul>".to_string());
        }
        Block::Preformatted(lines) => {
            out.push(format!("<pre>\n{}\n</pre>", html_escape(&lines.join("\n"))));
        }
    }
}

/// Inline markup for one block of raw text.
fn inline(raw: &str, link: &dyn Fn(&str) -> String) -> String {
    let text = html_escape(raw);
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in RE_VERBATIM.captures_iter(&text) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        out.push_str(&markup(&text[last..whole.start], link));
        match caps.get(1) {
            Some(code) => {
                out.push_str(&format!("<code>{}</code>", code.as_str()));
                last = whole.end;
            }
            None => {
                let url = text[whole.clone()].trim_end_matches(['.', ',', ';', ':', '!', '?', ')']);
                out.push_str(&format!("<a href=\"{url}\">{url}</a>"));
                last = whole.start + url.len();
            }
        }
    }
    out.push_str(&markup(&text[last..], link));
    out
}

fn markup(text: &str, link: &dyn Fn(&str) -> String) -> String {
    let text = emphasize(text, '*', "b");
    let text = emphasize(&text, '_', "i");
    RE_NAME
        .replace_all(&text, |caps: &regex::Captures| link(&caps[1]))
        .into_owned()
}

/// Wrap `delim`-delimited spans in `<tag>`. A span must not start or end with
/// whitespace and must not touch word characters on the outside.
fn emphasize(text: &str, delim: char, tag: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == delim && (i == 0 || !chars[i - 1].is_alphanumeric()) {
            if let Some(end) = closing_delim(&chars, i, delim) {
                let inner: String = chars[i + 1..end].iter().collect();
                out.push_str(&format!("<{tag}>{inner}</{tag}>"));
                i = end + 1;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

fn closing_delim(chars: &[char], start: usize, delim: char) -> Option<usize> {
    let first = *chars.get(start + 1)?;
    if first.is_whitespace() || first == delim {
        return None;
    }
    (start + 2..chars.len()).find(|&j| {
        chars[j] == delim
            && !chars[j - 1].is_whitespace()
            && chars.get(j + 1).map_or(true, |c| !c.is_alphanumeric())
    })
}
