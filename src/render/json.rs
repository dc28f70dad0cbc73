//! JSON renderer: the library's dictionary form as text.

use crate::error::Result;
use crate::model::LibraryDoc;
use crate::render::Renderer;

pub struct JsonRenderer {
    /// Spaces per level; `None` renders compactly.
    pub indent: Option<usize>,
}

impl Default for JsonRenderer {
    fn default() -> Self {
        JsonRenderer { indent: Some(2) }
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, lib: &LibraryDoc) -> Result<String> {
        let mut out = lib.to_json(self.indent)?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_parseable_json() {
        let lib = LibraryDoc::new("Lib").with_version("2.0");
        let out = JsonRenderer::default().render(&lib).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["name"], "Lib");
        assert_eq!(value["version"], "2.0");
        assert!(out.starts_with("{\n  \"name\""));
    }

    #[test]
    fn compact_when_no_indent() {
        let out = JsonRenderer { indent: None }
            .render(&LibraryDoc::new("Lib"))
            .unwrap();
        assert_eq!(out.lines().count(), 1);
    }
}
