//! Runtype descriptors
//!
//! A [`Descriptor`] is the reflected shape of a runtype: a tag plus
//! kind-specific parameters. Descriptors are immutable data used for
//! introspection and for rendering failure messages. They never drive
//! validation behavior themselves.

use crate::errors::RuntypeError;
use crate::runtype::Runtype;
use crate::validators::lazy::LazyRuntype;
use crate::value::{format_number, Value};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Key Kind
// ============================================================================

/// Key domain accepted by a dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyKind {
    /// Any string key; arrays are rejected
    #[default]
    String,
    /// Keys must convert to a number; arrays are accepted
    Number,
}

impl KeyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for KeyKind {
    type Err = RuntypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            other => Err(RuntypeError::InvalidKeyKind(other.to_string())),
        }
    }
}

// ============================================================================
// Literal Value
// ============================================================================

/// Primitive value a literal runtype matches exactly
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
}

impl LiteralValue {
    /// The runtime value this literal stands for
    pub fn to_value(&self) -> Value {
        match self {
            Self::Undefined => Value::Undefined,
            Self::Null => Value::Null,
            Self::Boolean(b) => Value::Boolean(*b),
            Self::Number(n) => Value::Number(*n),
            Self::String(s) => Value::String(s.clone()),
        }
    }

    /// Strict equality against a runtime value (`NaN` never matches)
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Undefined, Value::Undefined) | (Self::Null, Value::Null) => true,
            (Self::Boolean(a), Value::Boolean(b)) => a == b,
            (Self::Number(a), Value::Number(b)) => a == b,
            (Self::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::String(s) => write!(f, "{}", s),
        }
    }
}

impl TryFrom<Value> for LiteralValue {
    type Error = RuntypeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Undefined => Ok(Self::Undefined),
            Value::Null => Ok(Self::Null),
            Value::Boolean(b) => Ok(Self::Boolean(b)),
            Value::Number(n) => Ok(Self::Number(n)),
            Value::String(s) => Ok(Self::String(s)),
            other => Err(RuntypeError::NonPrimitiveLiteral(other.kind_name())),
        }
    }
}

impl From<bool> for LiteralValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<f64> for LiteralValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for LiteralValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for LiteralValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

// ============================================================================
// Descriptor
// ============================================================================

/// Reflected shape of a runtype
///
/// Children are held as [`Runtype`] handles, so a composite descriptor embeds
/// its children's descriptors without copying them.
#[derive(Debug, Clone, PartialEq)]
pub enum Descriptor {
    // ========================================================================
    // Primitive Types
    // ========================================================================
    /// Accepts anything
    Unknown,
    /// Accepts nothing
    Never,
    Boolean,
    Number,
    String,
    Function,
    /// Exactly one primitive value
    Literal(LiteralValue),

    // ========================================================================
    // Container Types
    // ========================================================================
    /// Homogeneous array
    Array { element: Runtype },

    /// Fixed-length array with per-position types
    Tuple { components: Vec<Runtype> },

    /// Object with declared fields (all optional when `partial`)
    Record {
        fields: Vec<(String, Runtype)>,
        partial: bool,
    },

    /// Keyed collection of homogeneous values
    Dictionary { key: KeyKind, value: Runtype },

    // ========================================================================
    // Combinators
    // ========================================================================
    Union { alternatives: Vec<Runtype> },

    Intersect { intersectees: Vec<Runtype> },

    /// Underlying runtype refined by a user check
    Constraint {
        underlying: Runtype,
        name: Option<String>,
    },

    /// Nominal tag over an entity runtype
    Brand { brand: String, entity: Runtype },

    /// Object whose prototype is the named class
    InstanceOf { class: String },

    /// Deferred runtype, resolved on first use
    Lazy(LazyRuntype),
}

impl Descriptor {
    /// Kind tag of this descriptor
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Never => "never",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Function => "function",
            Self::Literal(_) => "literal",
            Self::Array { .. } => "array",
            Self::Tuple { .. } => "tuple",
            Self::Record { .. } => "record",
            Self::Dictionary { .. } => "dictionary",
            Self::Union { .. } => "union",
            Self::Intersect { .. } => "intersect",
            Self::Constraint { .. } => "constraint",
            Self::Brand { .. } => "brand",
            Self::InstanceOf { .. } => "instanceof",
            Self::Lazy(_) => "lazy",
        }
    }
}

// ============================================================================
// Serialization
// ============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for LiteralValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Undefined | Self::Null => serializer.serialize_none(),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::String(s) => serializer.serialize_str(s),
        }
    }
}

/// Record fields serialized as an ordered map
#[cfg(feature = "serde")]
struct FieldMap<'a>(&'a [(String, Runtype)]);

#[cfg(feature = "serde")]
impl serde::Serialize for FieldMap<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, runtype)| (name, runtype)))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Descriptor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("tag", self.tag())?;
        match self {
            Self::Unknown
            | Self::Never
            | Self::Boolean
            | Self::Number
            | Self::String
            | Self::Function
            | Self::Lazy(_) => {}
            Self::Literal(value) => {
                if *value != LiteralValue::Undefined {
                    map.serialize_entry("value", value)?;
                }
            }
            Self::Array { element } => map.serialize_entry("element", element)?,
            Self::Tuple { components } => map.serialize_entry("components", components)?,
            Self::Record { fields, partial } => {
                map.serialize_entry("fields", &FieldMap(fields))?;
                if *partial {
                    map.serialize_entry("partial", &true)?;
                }
            }
            Self::Dictionary { key, value } => {
                map.serialize_entry("key", key.as_str())?;
                map.serialize_entry("value", value)?;
            }
            Self::Union { alternatives } => map.serialize_entry("alternatives", alternatives)?,
            Self::Intersect { intersectees } => map.serialize_entry("intersectees", intersectees)?,
            Self::Constraint { underlying, name } => {
                map.serialize_entry("underlying", underlying)?;
                if let Some(name) = name {
                    map.serialize_entry("name", name)?;
                }
            }
            Self::Brand { brand, entity } => {
                map.serialize_entry("brand", brand)?;
                map.serialize_entry("entity", entity)?;
            }
            Self::InstanceOf { class } => map.serialize_entry("ctor", class)?,
        }
        map.end()
    }
}
