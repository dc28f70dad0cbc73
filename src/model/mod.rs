//! Data model for library documentation.
//!
//! A [`LibraryDoc`] owns its constructors ("inits"), keywords and the data
//! types their arguments reference. Everything here is format-agnostic; the
//! renderers in [`crate::render`] decide how a library is written out.

pub mod argument;
pub mod datatype;
pub mod keyword;
pub mod library;

pub use argument::{ArgKind, ArgType, ArgumentDoc};
pub use datatype::{
    Annotation, DataType, EnumDoc, EnumMember, NativeEnum, NativeType, NativeTypedDict,
    TypeCategory, TypeRef, TypedDictDoc,
};
pub use keyword::{KeywordDoc, KeywordParent};
pub use library::{register_types, LibraryDoc, TIMESTAMP_FORMAT};

use crate::error::{LibdocError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What kind of file the documented library came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LibraryType {
    #[default]
    Library,
    Resource,
    Suite,
}

impl LibraryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryType::Library => "LIBRARY",
            LibraryType::Resource => "RESOURCE",
            LibraryType::Suite => "SUITE",
        }
    }
}

/// Library instance scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Scope {
    Global,
    Suite,
    #[default]
    Test,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Global => "GLOBAL",
            Scope::Suite => "SUITE",
            Scope::Test => "TEST",
        }
    }
}

/// Markup used in documentation text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocFormat {
    #[default]
    Robot,
    Html,
    Text,
    Rest,
}

impl DocFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocFormat::Robot => "ROBOT",
            DocFormat::Html => "HTML",
            DocFormat::Text => "TEXT",
            DocFormat::Rest => "REST",
        }
    }

    /// Parse an optional format name. Absent or blank means ROBOT.
    pub fn parse_or_default(value: Option<&str>) -> Result<DocFormat> {
        match value.map(str::trim) {
            None | Some("") => Ok(DocFormat::default()),
            Some(name) => name.parse(),
        }
    }
}

macro_rules! impl_upper_enum {
    ($ty:ty, $what:literal, [$($name:literal => $variant:expr),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = LibdocError;

            fn from_str(s: &str) -> Result<Self> {
                match s.to_ascii_uppercase().as_str() {
                    $($name => Ok($variant),)+
                    _ => Err(LibdocError::UnknownValue {
                        what: $what,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_upper_enum!(LibraryType, "library type", [
    "LIBRARY" => LibraryType::Library,
    "RESOURCE" => LibraryType::Resource,
    "SUITE" => LibraryType::Suite,
]);

impl_upper_enum!(Scope, "scope", [
    "GLOBAL" => Scope::Global,
    "SUITE" => Scope::Suite,
    "TEST" => Scope::Test,
]);

impl_upper_enum!(DocFormat, "doc format", [
    "ROBOT" => DocFormat::Robot,
    "HTML" => DocFormat::Html,
    "TEXT" => DocFormat::Text,
    "REST" => DocFormat::Rest,
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_format_defaults_to_robot() {
        assert_eq!(DocFormat::parse_or_default(None).unwrap(), DocFormat::Robot);
        assert_eq!(DocFormat::parse_or_default(Some("")).unwrap(), DocFormat::Robot);
        assert_eq!(DocFormat::parse_or_default(Some("  ")).unwrap(), DocFormat::Robot);
    }

    #[test]
    fn doc_format_is_case_insensitive() {
        assert_eq!(DocFormat::parse_or_default(Some("html")).unwrap(), DocFormat::Html);
        assert_eq!("Text".parse::<DocFormat>().unwrap(), DocFormat::Text);
    }

    #[test]
    fn unknown_values_are_errors() {
        assert!("markdown".parse::<DocFormat>().is_err());
        assert!("module".parse::<LibraryType>().is_err());
        assert!("local".parse::<Scope>().is_err());
    }

    #[test]
    fn display_matches_serialized_form() {
        assert_eq!(Scope::Global.to_string(), "GLOBAL");
        assert_eq!(
            serde_json::to_value(LibraryType::Resource).unwrap(),
            serde_json::json!("RESOURCE")
        );
    }
}
