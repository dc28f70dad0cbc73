//! Documentation model for test libraries.
//!
//! Introspected keywords, their arguments and the data types they reference
//! are normalized into a [`LibraryDoc`], which exports a deterministic
//! dictionary/JSON form or a standalone HTML page.
//!
//! # Architecture
//!
//! - `model`: library, keyword, argument and data type descriptors
//! - `toc`: `%TOC%` expansion for library introductions
//! - `format`: documentation markup → HTML, and HTML → short doc text
//! - `render`: HTML and JSON renderers
//! - `output`: file/stdout sink used by [`LibraryDoc::save`]

pub mod error;
pub mod format;
pub mod model;
pub mod output;
pub mod render;
pub mod tags;
pub mod text;
pub mod toc;

pub use error::{LibdocError, Result};
pub use model::*;
pub use tags::Tags;
