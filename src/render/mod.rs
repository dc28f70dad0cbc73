//! Trait-based renderer dispatch.

pub mod html;
pub mod json;

use crate::error::{LibdocError, Result};
use crate::model::LibraryDoc;

/// Trait for rendering a LibraryDoc into a specific output format.
pub trait Renderer {
    fn render(&self, lib: &LibraryDoc) -> Result<String>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format.to_ascii_lowercase().as_str() {
        "html" | "htm" => Ok(Box::new(html::HtmlRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer::default())),
        _ => Err(LibdocError::UnknownFormat(format.to_string())),
    }
}
