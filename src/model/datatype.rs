//! Data type descriptors: enumerations and TypedDict-like records referenced
//! from keyword arguments.
//!
//! A descriptor can be built from three sources, all funneled through
//! [`DataType::normalize`]:
//!
//! - [`TypeRef::Descriptor`]: an already normalized descriptor (copied)
//! - [`TypeRef::Native`]: a type as reported by the introspection layer
//! - [`TypeRef::Serialized`]: the dictionary form produced by `to_dictionary`

use crate::error::{LibdocError, Result};
use serde_json::{json, Map, Value};

/// A type reference attached to an argument.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    Descriptor(DataType),
    Native(NativeType),
    Serialized(Value),
}

/// Which descriptor, if any, a type reference can be normalized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Enum,
    TypedDict,
    Unsupported,
}

impl TypeRef {
    pub fn category(&self) -> TypeCategory {
        match self {
            TypeRef::Descriptor(DataType::Enum(_)) => TypeCategory::Enum,
            TypeRef::Descriptor(DataType::TypedDict(_)) => TypeCategory::TypedDict,
            TypeRef::Native(NativeType::Enum(_)) => TypeCategory::Enum,
            TypeRef::Native(NativeType::TypedDict(_)) => TypeCategory::TypedDict,
            TypeRef::Native(NativeType::Other(_)) => TypeCategory::Unsupported,
            TypeRef::Serialized(value) => serialized_category(value),
        }
    }
}

fn serialized_category(value: &Value) -> TypeCategory {
    match value.get("super").and_then(Value::as_str) {
        Some(ENUM_SUPER) => TypeCategory::Enum,
        Some(TYPED_DICT_SUPER) => TypeCategory::TypedDict,
        _ => TypeCategory::Unsupported,
    }
}

/// Introspected type, as handed over by whatever discovered the library.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeType {
    Enum(NativeEnum),
    TypedDict(NativeTypedDict),
    /// Builtins, generics and anything else that is not documented.
    Other(String),
}

impl NativeType {
    pub fn name(&self) -> &str {
        match self {
            NativeType::Enum(e) => &e.name,
            NativeType::TypedDict(t) => &t.name,
            NativeType::Other(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NativeEnum {
    pub name: String,
    pub doc: Option<String>,
    /// Members in declaration order.
    pub members: Vec<(String, Value)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NativeTypedDict {
    pub name: String,
    pub doc: Option<String>,
    /// Field annotations in declaration order.
    pub annotations: Vec<(String, Annotation)>,
    pub required_keys: Vec<String>,
    pub optional_keys: Vec<String>,
}

/// A field annotation: either a plain class or an arbitrary type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    Class(String),
    Expr(String),
}

impl Annotation {
    pub fn render(&self) -> &str {
        match self {
            Annotation::Class(name) => name,
            Annotation::Expr(text) => text,
        }
    }
}

const ENUM_SUPER: &str = "Enum";
const TYPED_DICT_SUPER: &str = "TypedDict";

/// A normalized data type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    Enum(EnumDoc),
    TypedDict(TypedDictDoc),
}

impl DataType {
    /// Normalize a type reference. Returns `None` for types that are neither
    /// enums nor TypedDicts.
    pub fn normalize(type_ref: &TypeRef) -> Result<Option<DataType>> {
        let descriptor = match (type_ref.category(), type_ref) {
            (TypeCategory::Unsupported, _) => return Ok(None),
            (_, TypeRef::Descriptor(descriptor)) => descriptor.clone(),
            (_, TypeRef::Serialized(value)) => return Self::from_dict(value),
            (TypeCategory::Enum, TypeRef::Native(NativeType::Enum(native))) => {
                DataType::Enum(EnumDoc::from_native(native))
            }
            (TypeCategory::TypedDict, TypeRef::Native(NativeType::TypedDict(native))) => {
                DataType::TypedDict(TypedDictDoc::from_native(native))
            }
            (_, TypeRef::Native(_)) => return Ok(None),
        };
        Ok(Some(descriptor))
    }

    /// Build a descriptor from its dictionary form, dispatching on `super`.
    pub fn from_dict(value: &Value) -> Result<Option<DataType>> {
        let Some(map) = value.as_object() else {
            return Ok(None);
        };
        match serialized_category(value) {
            TypeCategory::Enum => Ok(Some(DataType::Enum(EnumDoc::from_dict(map)?))),
            TypeCategory::TypedDict => Ok(Some(DataType::TypedDict(TypedDictDoc::from_dict(map)?))),
            TypeCategory::Unsupported => Ok(None),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DataType::Enum(e) => &e.name,
            DataType::TypedDict(t) => &t.name,
        }
    }

    pub fn doc(&self) -> &str {
        match self {
            DataType::Enum(e) => &e.doc,
            DataType::TypedDict(t) => &t.doc,
        }
    }

    pub fn set_doc(&mut self, doc: String) {
        match self {
            DataType::Enum(e) => e.doc = doc,
            DataType::TypedDict(t) => t.doc = doc,
        }
    }

    pub fn super_name(&self) -> &'static str {
        match self {
            DataType::Enum(_) => ENUM_SUPER,
            DataType::TypedDict(_) => TYPED_DICT_SUPER,
        }
    }

    pub fn to_dictionary(&self) -> Value {
        match self {
            DataType::Enum(e) => e.to_dictionary(),
            DataType::TypedDict(t) => t.to_dictionary(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDoc {
    pub name: String,
    pub doc: String,
    pub members: Vec<EnumMember>,
}

impl EnumDoc {
    pub fn from_native(native: &NativeEnum) -> Self {
        EnumDoc {
            name: native.name.clone(),
            doc: native.doc.clone().unwrap_or_default(),
            members: native
                .members
                .iter()
                .map(|(name, value)| EnumMember {
                    name: name.clone(),
                    value: value_text(value),
                })
                .collect(),
        }
    }

    pub fn from_dict(map: &Map<String, Value>) -> Result<Self> {
        let kind = ENUM_SUPER;
        let members = require(map, kind, "members")?
            .as_array()
            .ok_or_else(|| malformed(kind, "members"))?
            .iter()
            .map(|member| {
                let member = member.as_object().ok_or_else(|| malformed(kind, "members"))?;
                Ok(EnumMember {
                    name: require_str(member, kind, "name")?,
                    value: value_text(require(member, kind, "value")?),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(EnumDoc {
            name: require_str(map, kind, "name")?,
            doc: require_doc(map, kind)?,
            members,
        })
    }

    pub fn to_dictionary(&self) -> Value {
        let members: Vec<Value> = self
            .members
            .iter()
            .map(|m| json!({ "name": m.name, "value": m.value }))
            .collect();
        json!({
            "name": self.name,
            "super": ENUM_SUPER,
            "doc": self.doc,
            "members": members,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedDictDoc {
    pub name: String,
    pub doc: String,
    /// Field name → rendered type, in declaration order.
    pub items: Vec<(String, String)>,
    pub required_keys: Vec<String>,
    pub optional_keys: Vec<String>,
}

impl TypedDictDoc {
    pub fn from_native(native: &NativeTypedDict) -> Self {
        TypedDictDoc {
            name: native.name.clone(),
            doc: native.doc.clone().unwrap_or_default(),
            items: native
                .annotations
                .iter()
                .map(|(key, annotation)| (key.clone(), annotation.render().to_string()))
                .collect(),
            required_keys: native.required_keys.clone(),
            optional_keys: native.optional_keys.clone(),
        }
    }

    pub fn from_dict(map: &Map<String, Value>) -> Result<Self> {
        let kind = TYPED_DICT_SUPER;
        let items = require(map, kind, "items")?
            .as_object()
            .ok_or_else(|| malformed(kind, "items"))?
            .iter()
            .map(|(key, value)| (key.clone(), value_text(value)))
            .collect();
        Ok(TypedDictDoc {
            name: require_str(map, kind, "name")?,
            doc: require_doc(map, kind)?,
            items,
            required_keys: require_str_list(map, kind, "required_keys")?,
            optional_keys: require_str_list(map, kind, "optional_keys")?,
        })
    }

    pub fn to_dictionary(&self) -> Value {
        let items: Map<String, Value> = self
            .items
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();
        json!({
            "name": self.name,
            "super": TYPED_DICT_SUPER,
            "doc": self.doc,
            "items": items,
            "required_keys": self.required_keys,
            "optional_keys": self.optional_keys,
        })
    }
}

/// Textual form of a member value or field type.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn malformed(kind: &'static str, key: &str) -> LibdocError {
    LibdocError::MalformedType {
        kind,
        key: key.to_string(),
    }
}

fn require<'a>(map: &'a Map<String, Value>, kind: &'static str, key: &str) -> Result<&'a Value> {
    map.get(key).ok_or_else(|| malformed(kind, key))
}

fn require_str(map: &Map<String, Value>, kind: &'static str, key: &str) -> Result<String> {
    require(map, kind, key)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| malformed(kind, key))
}

// `doc` must be present, but a serialized null stands for "no documentation".
fn require_doc(map: &Map<String, Value>, kind: &'static str) -> Result<String> {
    match require(map, kind, "doc")? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        _ => Err(malformed(kind, "doc")),
    }
}

fn require_str_list(map: &Map<String, Value>, kind: &'static str, key: &str) -> Result<Vec<String>> {
    require(map, kind, key)?
        .as_array()
        .ok_or_else(|| malformed(kind, key))?
        .iter()
        .map(|v| v.as_str().map(str::to_string).ok_or_else(|| malformed(kind, key)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direction() -> NativeEnum {
        NativeEnum {
            name: "Direction".to_string(),
            doc: Some("Compass direction.".to_string()),
            members: vec![
                ("NORTH".to_string(), json!("n")),
                ("SOUTH".to_string(), json!(2)),
            ],
        }
    }

    fn point() -> NativeTypedDict {
        NativeTypedDict {
            name: "Point".to_string(),
            doc: None,
            annotations: vec![
                ("x".to_string(), Annotation::Class("int".to_string())),
                ("tags".to_string(), Annotation::Expr("List[str]".to_string())),
            ],
            required_keys: vec!["x".to_string()],
            optional_keys: vec!["tags".to_string()],
        }
    }

    #[test]
    fn enum_from_native_renders_values_as_text() {
        let doc = EnumDoc::from_native(&direction());
        assert_eq!(doc.name, "Direction");
        assert_eq!(doc.doc, "Compass direction.");
        assert_eq!(
            doc.members,
            vec![
                EnumMember { name: "NORTH".into(), value: "n".into() },
                EnumMember { name: "SOUTH".into(), value: "2".into() },
            ]
        );
    }

    #[test]
    fn typed_dict_from_native_renders_annotations() {
        let doc = TypedDictDoc::from_native(&point());
        assert_eq!(doc.doc, "");
        assert_eq!(
            doc.items,
            vec![
                ("x".to_string(), "int".to_string()),
                ("tags".to_string(), "List[str]".to_string()),
            ]
        );
        assert_eq!(doc.required_keys, vec!["x"]);
        assert_eq!(doc.optional_keys, vec!["tags"]);
    }

    #[test]
    fn enum_dictionary_round_trip() {
        let original = DataType::Enum(EnumDoc::from_native(&direction()));
        let restored = DataType::normalize(&TypeRef::Serialized(original.to_dictionary()))
            .unwrap()
            .unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn typed_dict_dictionary_round_trip_keeps_field_order() {
        let original = DataType::TypedDict(TypedDictDoc::from_native(&point()));
        let dict = original.to_dictionary();
        assert_eq!(dict["super"], "TypedDict");
        let restored = DataType::from_dict(&dict).unwrap().unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn descriptor_normalizes_to_itself() {
        let descriptor = DataType::Enum(EnumDoc::from_native(&direction()));
        let normalized = DataType::normalize(&TypeRef::Descriptor(descriptor.clone()))
            .unwrap()
            .unwrap();
        assert_eq!(normalized, descriptor);
    }

    #[test]
    fn unsupported_types_normalize_to_none() {
        let other = TypeRef::Native(NativeType::Other("int".to_string()));
        assert_eq!(other.category(), TypeCategory::Unsupported);
        assert!(DataType::normalize(&other).unwrap().is_none());

        let unknown = TypeRef::Serialized(json!({ "name": "X", "super": "Class" }));
        assert!(DataType::normalize(&unknown).unwrap().is_none());
    }

    #[test]
    fn serialized_category_follows_super() {
        let value = TypeRef::Serialized(json!({ "super": "TypedDict" }));
        assert_eq!(value.category(), TypeCategory::TypedDict);
    }

    #[test]
    fn normalize_agrees_with_category() {
        let refs = [
            TypeRef::Native(NativeType::Enum(direction())),
            TypeRef::Native(NativeType::TypedDict(point())),
            TypeRef::Native(NativeType::Other("str".to_string())),
            TypeRef::Descriptor(DataType::TypedDict(TypedDictDoc::from_native(&point()))),
            TypeRef::Serialized(DataType::Enum(EnumDoc::from_native(&direction())).to_dictionary()),
            TypeRef::Serialized(json!("Direction")),
        ];
        for type_ref in &refs {
            let normalized = DataType::normalize(type_ref).unwrap();
            let category = match normalized {
                Some(DataType::Enum(_)) => TypeCategory::Enum,
                Some(DataType::TypedDict(_)) => TypeCategory::TypedDict,
                None => TypeCategory::Unsupported,
            };
            assert_eq!(category, type_ref.category(), "{type_ref:?}");
        }
    }

    #[test]
    fn missing_key_is_an_error() {
        let broken = json!({ "name": "Direction", "super": "Enum", "doc": "" });
        let err = DataType::from_dict(&broken).unwrap_err();
        assert!(matches!(
            err,
            LibdocError::MalformedType { kind: "Enum", ref key } if key == "members"
        ));
    }

    #[test]
    fn null_doc_reads_as_empty() {
        let value = json!({ "name": "E", "super": "Enum", "doc": null, "members": [] });
        let DataType::Enum(doc) = DataType::from_dict(&value).unwrap().unwrap() else {
            panic!("expected enum");
        };
        assert_eq!(doc.doc, "");
    }
}
