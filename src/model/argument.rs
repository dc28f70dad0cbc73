//! Keyword arguments as reported by introspection.

use super::datatype::{DataType, NativeType, TypeRef};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// How an argument is passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArgKind {
    PositionalOnly,
    PositionalOnlyMarker,
    #[default]
    PositionalOrNamed,
    VarPositional,
    NamedOnlyMarker,
    NamedOnly,
    VarNamed,
}

impl ArgKind {
    fn is_marker(&self) -> bool {
        matches!(self, ArgKind::PositionalOnlyMarker | ArgKind::NamedOnlyMarker)
    }

    fn is_variadic(&self) -> bool {
        matches!(self, ArgKind::VarPositional | ArgKind::VarNamed)
    }
}

/// One type accepted by an argument: the name shown to users plus what it
/// refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgType {
    pub display: String,
    pub reference: TypeRef,
}

impl ArgType {
    pub fn new(display: impl Into<String>, reference: TypeRef) -> Self {
        ArgType {
            display: display.into(),
            reference,
        }
    }

    /// A type that is shown but never documented as a data type.
    pub fn plain(name: impl Into<String>) -> Self {
        let name = name.into();
        ArgType {
            reference: TypeRef::Native(NativeType::Other(name.clone())),
            display: name,
        }
    }

    /// Display name taken from the native type itself.
    pub fn native(native: NativeType) -> Self {
        ArgType {
            display: native.name().to_string(),
            reference: TypeRef::Native(native),
        }
    }

    pub fn descriptor(descriptor: DataType) -> Self {
        ArgType {
            display: descriptor.name().to_string(),
            reference: TypeRef::Descriptor(descriptor),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDoc {
    pub name: String,
    pub kind: ArgKind,
    pub types: Vec<ArgType>,
    /// Rendered default value, if the argument has one.
    pub default: Option<String>,
}

impl ArgumentDoc {
    pub fn new(name: impl Into<String>, kind: ArgKind) -> Self {
        ArgumentDoc {
            name: name.into(),
            kind,
            types: Vec::new(),
            default: None,
        }
    }

    pub fn with_type(mut self, arg_type: ArgType) -> Self {
        self.types.push(arg_type);
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn required(&self) -> bool {
        !self.kind.is_marker() && !self.kind.is_variadic() && self.default.is_none()
    }

    /// Rendered type names, in declaration order.
    pub fn type_names(&self) -> Vec<&str> {
        self.types.iter().map(|t| t.display.as_str()).collect()
    }

    /// Type names joined with ` | `, or `None` when untyped.
    pub fn type_repr(&self) -> Option<String> {
        if self.types.is_empty() {
            None
        } else {
            Some(self.type_names().join(" | "))
        }
    }

    pub fn to_dictionary(&self) -> Value {
        json!({
            "name": self.name,
            "type": self.type_names(),
            "default": self.default,
            "kind": self.kind,
            "required": self.required(),
            "repr": self.to_string(),
        })
    }
}

impl fmt::Display for ArgumentDoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ArgKind::PositionalOnlyMarker => return f.write_str("/"),
            ArgKind::NamedOnlyMarker => return f.write_str("*"),
            ArgKind::VarPositional => write!(f, "*{}", self.name)?,
            ArgKind::VarNamed => write!(f, "**{}", self.name)?,
            _ => f.write_str(&self.name)?,
        }
        let separator = match self.type_repr() {
            Some(types) => {
                write!(f, ": {}", types)?;
                " = "
            }
            None => "=",
        };
        if let Some(ref default) = self.default {
            write!(f, "{}{}", separator, default)?;
        }
        Ok(())
    }
}
