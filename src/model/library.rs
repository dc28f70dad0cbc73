//! The root aggregate: one documented library.

use super::argument::{ArgKind, ArgType, ArgumentDoc};
use super::datatype::{DataType, TypeRef};
use super::keyword::{KeywordDoc, KeywordParent};
use super::{DocFormat, LibraryType, Scope};
use crate::error::{LibdocError, Result};
use crate::format::DocFormatter;
use crate::output::LibdocOutput;
use crate::render::{self, Renderer};
use crate::tags::Tags;
use crate::toc;
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Format of the `generated` timestamp: day-separated date, no fractions.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct LibraryDoc {
    pub name: String,
    doc: String,
    pub version: String,
    pub lib_type: LibraryType,
    pub scope: Scope,
    doc_format: DocFormat,
    pub source: Option<String>,
    /// `-1` when unknown.
    pub lineno: i64,
    inits: Vec<KeywordDoc>,
    keywords: Vec<KeywordDoc>,
    /// Display name → descriptor.
    data_types: BTreeMap<String, DataType>,
}

impl LibraryDoc {
    pub fn new(name: impl Into<String>) -> Self {
        LibraryDoc {
            name: name.into(),
            doc: String::new(),
            version: String::new(),
            lib_type: LibraryType::default(),
            scope: Scope::default(),
            doc_format: DocFormat::default(),
            source: None,
            lineno: -1,
            inits: Vec::new(),
            keywords: Vec::new(),
            data_types: BTreeMap::new(),
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_type(mut self, lib_type: LibraryType) -> Self {
        self.lib_type = lib_type;
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_doc_format(mut self, doc_format: Option<DocFormat>) -> Self {
        self.set_doc_format(doc_format);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>, lineno: i64) -> Self {
        self.source = Some(source.into());
        self.lineno = lineno;
        self
    }

    /// Documentation with any `%TOC%` marker expanded.
    pub fn doc(&self) -> String {
        toc::render_toc(self.doc_format, &self.doc, !self.inits.is_empty())
    }

    /// Documentation exactly as given.
    pub fn raw_doc(&self) -> &str {
        &self.doc
    }

    pub fn set_doc(&mut self, doc: impl Into<String>) {
        self.doc = doc.into();
    }

    pub fn doc_format(&self) -> DocFormat {
        self.doc_format
    }

    /// Set the documentation format; `None` means ROBOT.
    pub fn set_doc_format(&mut self, doc_format: Option<DocFormat>) {
        self.doc_format = doc_format.unwrap_or_default();
        self.refresh_parents();
    }

    pub fn inits(&self) -> &[KeywordDoc] {
        &self.inits
    }

    pub fn keywords(&self) -> &[KeywordDoc] {
        &self.keywords
    }

    pub fn data_types(&self) -> &BTreeMap<String, DataType> {
        &self.data_types
    }

    /// Registered data types ordered by their own name. A type registered
    /// under several display names is listed once.
    pub fn sorted_data_types(&self) -> Vec<&DataType> {
        let mut types: Vec<&DataType> = self.data_types.values().collect();
        types.sort_by(|a, b| a.name().cmp(b.name()));
        types.dedup_by(|a, b| a.name() == b.name());
        types
    }

    pub fn set_inits(&mut self, inits: Vec<KeywordDoc>) -> Result<()> {
        self.inits = self.adopt(inits)?;
        Ok(())
    }

    pub fn set_keywords(&mut self, keywords: Vec<KeywordDoc>) -> Result<()> {
        self.keywords = self.adopt(keywords)?;
        Ok(())
    }

    /// Replace the registered data types. Types referenced by the current
    /// inits and keywords are registered again afterwards.
    pub fn set_data_types<I>(&mut self, types: I) -> Result<()>
    where
        I: IntoIterator<Item = TypeRef>,
    {
        self.data_types.clear();
        for type_ref in types {
            match DataType::normalize(&type_ref)? {
                Some(descriptor) => {
                    self.data_types
                        .entry(descriptor.name().to_string())
                        .or_insert(descriptor);
                }
                None => tracing::debug!(?type_ref, "ignoring unsupported data type"),
            }
        }
        register_types(&mut self.data_types, &self.inits)?;
        register_types(&mut self.data_types, &self.keywords)?;
        Ok(())
    }

    /// Register argument types, attach the keywords to this library, freeze
    /// their short docs and sort them.
    fn adopt(&mut self, mut keywords: Vec<KeywordDoc>) -> Result<Vec<KeywordDoc>> {
        register_types(&mut self.data_types, &keywords)?;
        let parent = self.parent_info();
        for keyword in &mut keywords {
            keyword.set_parent(parent.clone());
            keyword.generate_shortdoc();
        }
        keywords.sort_by_cached_key(KeywordDoc::sort_key);
        Ok(keywords)
    }

    fn parent_info(&self) -> KeywordParent {
        KeywordParent {
            name: self.name.clone(),
            doc_format: self.doc_format,
        }
    }

    fn refresh_parents(&mut self) {
        let parent = self.parent_info();
        for keyword in self.inits.iter_mut().chain(self.keywords.iter_mut()) {
            if keyword.parent().is_some() {
                keyword.set_parent(parent.clone());
            }
        }
    }

    pub fn all_tags(&self) -> Tags {
        Tags::new(self.keywords.iter().flat_map(|kw| kw.tags.iter()))
    }

    /// Convert the library, init, keyword and data type docs to HTML.
    ///
    /// Calling this twice converts the already converted HTML again.
    pub fn convert_docs_to_html(&mut self) {
        let introduction = self.doc();
        let formatter = DocFormatter::new(
            self.keywords.iter().map(|kw| kw.name.as_str()),
            self.data_types.values().map(DataType::name),
            &introduction,
            self.doc_format,
        );
        self.doc = formatter.html(&introduction, true);
        for keyword in self.inits.iter_mut().chain(self.keywords.iter_mut()) {
            keyword.doc = formatter.html(&keyword.doc, false);
        }
        for data_type in self.data_types.values_mut() {
            let doc = formatter.html(data_type.doc(), false);
            data_type.set_doc(doc);
        }
        self.set_doc_format(Some(DocFormat::Html));
    }

    /// Dictionary form stamped with the current local time.
    pub fn to_dictionary(&self) -> Value {
        self.to_dictionary_at(chrono::Local::now().naive_local())
    }

    pub fn to_dictionary_at(&self, generated: NaiveDateTime) -> Value {
        let inits: Vec<Value> = self.inits.iter().map(KeywordDoc::to_dictionary).collect();
        let keywords: Vec<Value> = self.keywords.iter().map(KeywordDoc::to_dictionary).collect();
        let data_types: Vec<Value> = self
            .sorted_data_types()
            .into_iter()
            .map(DataType::to_dictionary)
            .collect();
        json!({
            "name": self.name,
            "doc": self.doc(),
            "version": self.version,
            "type": self.lib_type,
            "scope": self.scope,
            "doc_format": self.doc_format,
            "source": self.source,
            "lineno": self.lineno,
            "inits": inits,
            "keywords": keywords,
            "generated": generated.format(TIMESTAMP_FORMAT).to_string(),
            "all_tags": self.all_tags(),
            "data_types": data_types,
        })
    }

    /// JSON text; compact without `indent`, otherwise indented by that many
    /// spaces.
    pub fn to_json(&self, indent: Option<usize>) -> Result<String> {
        json_text(&self.to_dictionary(), indent)
    }

    pub fn to_json_at(&self, indent: Option<usize>, generated: NaiveDateTime) -> Result<String> {
        json_text(&self.to_dictionary_at(generated), indent)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_json_with_format(text, None)
    }

    /// Like [`from_json`](Self::from_json), with `doc_format` taking the
    /// place of the format stored in the spec.
    pub fn from_json_with_format(text: &str, doc_format: Option<DocFormat>) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_dictionary_with_format(&value, doc_format)
    }

    /// Rebuild a library from its dictionary form.
    pub fn from_dictionary(value: &Value) -> Result<Self> {
        Self::from_dictionary_with_format(value, None)
    }

    /// The format is settled before keywords are adopted, so derived short
    /// docs follow `doc_format` when it is given.
    pub fn from_dictionary_with_format(
        value: &Value,
        doc_format: Option<DocFormat>,
    ) -> Result<Self> {
        let map = value.as_object().ok_or_else(|| LibdocError::UnknownValue {
            what: "library spec",
            value: "expected a JSON object".to_string(),
        })?;

        let mut lib = LibraryDoc::new(string_field(map, "name"))
            .with_doc(string_field(map, "doc"))
            .with_version(string_field(map, "version"));
        if let Some(lib_type) = str_field(map, "type") {
            lib.lib_type = lib_type.parse()?;
        }
        if let Some(scope) = str_field(map, "scope") {
            lib.scope = scope.parse()?;
        }
        lib.doc_format = match doc_format {
            Some(doc_format) => doc_format,
            None => DocFormat::parse_or_default(str_field(map, "doc_format"))?,
        };
        lib.source = str_field(map, "source").map(str::to_string);
        lib.lineno = lineno_field(map);

        let types = list_field(map, "data_types")
            .iter()
            .map(|value| TypeRef::Serialized(value.clone()));
        lib.set_data_types(types)?;

        let inits = keywords_from_list(list_field(map, "inits"), &lib.data_types)?;
        lib.set_inits(inits)?;
        let keywords = keywords_from_list(list_field(map, "keywords"), &lib.data_types)?;
        lib.set_keywords(keywords)?;
        Ok(lib)
    }

    /// Render in `format` (`html` or `json`) and write to `output`, or to
    /// stdout when no path is given.
    pub fn save(&self, output: Option<&Path>, format: &str) -> Result<()> {
        let renderer = render::create_renderer(format)?;
        self.save_with(output, renderer.as_ref())
    }

    pub fn save_with(&self, output: Option<&Path>, renderer: &dyn Renderer) -> Result<()> {
        let rendered = renderer.render(self)?;
        let mut out = LibdocOutput::open(output)?;
        out.write_all(rendered.as_bytes())?;
        out.finish()
    }
}

/// Normalize and register every type referenced by `keywords`' arguments
/// that is not registered yet. The first registration of a name wins.
pub fn register_types(
    registry: &mut BTreeMap<String, DataType>,
    keywords: &[KeywordDoc],
) -> Result<()> {
    let arg_types = keywords
        .iter()
        .flat_map(|kw| kw.args.iter())
        .flat_map(|arg| arg.types.iter());
    for arg_type in arg_types {
        if registry.contains_key(&arg_type.display) {
            continue;
        }
        if let Some(descriptor) = DataType::normalize(&arg_type.reference)? {
            tracing::debug!(
                name = %arg_type.display,
                kind = descriptor.super_name(),
                "registered data type"
            );
            registry.insert(arg_type.display.clone(), descriptor);
        }
    }
    Ok(())
}

fn json_text(value: &Value, indent: Option<usize>) -> Result<String> {
    let Some(width) = indent else {
        return Ok(serde_json::to_string(value)?);
    };
    let indent = " ".repeat(width);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buf)
        .map_err(|e| LibdocError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

// -- Loading helpers ----------------------------------------------------------

fn str_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Value::as_str)
}

fn string_field(map: &Map<String, Value>, key: &str) -> String {
    str_field(map, key).unwrap_or_default().to_string()
}

fn list_field<'a>(map: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    map.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn lineno_field(map: &Map<String, Value>) -> i64 {
    map.get("lineno").and_then(Value::as_i64).unwrap_or(-1)
}

/// Look a type name up by display name, then by descriptor name.
fn resolve_type<'a>(registry: &'a BTreeMap<String, DataType>, name: &str) -> Option<&'a DataType> {
    registry
        .get(name)
        .or_else(|| registry.values().find(|descriptor| descriptor.name() == name))
}

fn keywords_from_list(
    list: &[Value],
    registry: &BTreeMap<String, DataType>,
) -> Result<Vec<KeywordDoc>> {
    list.iter()
        .map(|value| keyword_from_dict(value, registry))
        .collect()
}

fn keyword_from_dict(value: &Value, registry: &BTreeMap<String, DataType>) -> Result<KeywordDoc> {
    let empty = Map::new();
    let map = value.as_object().unwrap_or(&empty);
    let args = list_field(map, "args")
        .iter()
        .map(|arg| argument_from_dict(arg, registry))
        .collect::<Result<Vec<_>>>()?;
    let tags = list_field(map, "tags").iter().filter_map(Value::as_str);
    let mut keyword = KeywordDoc::new(string_field(map, "name"))
        .with_doc(string_field(map, "doc"))
        .with_args(args)
        .with_tags(tags)
        .with_shortdoc(string_field(map, "shortdoc"));
    keyword.source = str_field(map, "source").map(str::to_string);
    keyword.lineno = lineno_field(map);
    Ok(keyword)
}

fn argument_from_dict(value: &Value, registry: &BTreeMap<String, DataType>) -> Result<ArgumentDoc> {
    let empty = Map::new();
    let map = value.as_object().unwrap_or(&empty);
    let kind = match map.get("kind") {
        Some(kind) => serde_json::from_value::<ArgKind>(kind.clone()).map_err(|_| {
            LibdocError::UnknownValue {
                what: "argument kind",
                value: kind.to_string(),
            }
        })?,
        None => ArgKind::default(),
    };
    let type_names: Vec<&str> = match map.get("type") {
        Some(Value::Array(names)) => names.iter().filter_map(Value::as_str).collect(),
        Some(Value::String(name)) => vec![name.as_str()],
        _ => Vec::new(),
    };
    let mut arg = ArgumentDoc::new(string_field(map, "name"), kind);
    for name in type_names {
        arg = arg.with_type(match resolve_type(registry, name) {
            Some(descriptor) => ArgType::new(name, TypeRef::Descriptor(descriptor.clone())),
            None => ArgType::plain(name),
        });
    }
    arg.default = match map.get("default") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };
    Ok(arg)
}
