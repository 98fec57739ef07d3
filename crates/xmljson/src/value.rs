//! The JSON value model the projection builds and the serializer consumes.
//!
//! This module defines the [`Value`] enum, a tagged sum over the JSON data
//! types, together with the [`Map`] and [`Array`] aliases used throughout
//! the crate.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use indexmap::IndexMap;
use num_bigint::BigInt;

/// An object: string keys to values, preserving insertion order.
///
/// Equality on maps ignores order; equality on arrays does not. Both
/// properties fall straight out of `IndexMap` and `Vec`.
pub type Map = IndexMap<String, Value, foldhash::fast::RandomState>;

/// An array of values in document order.
pub type Array = Vec<Value>;

/// A JSON value.
///
/// Integers are kept exact: values that fit `i64` use [`Integer`], anything
/// larger promotes to [`BigInteger`]. Non-integral numbers are [`Double`].
///
/// # Examples
///
/// ```
/// use xmljson::{Map, Value};
///
/// let mut map = Map::default();
/// map.insert("key".into(), Value::String("value".into()));
/// assert_eq!(Value::Object(map).to_string(), r#"{"key":"value"}"#);
/// ```
///
/// [`Integer`]: Value::Integer
/// [`BigInteger`]: Value::BigInteger
/// [`Double`]: Value::Double
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    BigInteger(BigInt),
    Double(f64),
    String(String),
    Array(Array),
    Object(Map),
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<BigInt> for Value {
    fn from(v: BigInt) -> Self {
        Self::BigInteger(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`String`].
    ///
    /// [`String`]: Value::String
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is [`Array`].
    ///
    /// [`Array`]: Value::Array
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`Object`].
    ///
    /// [`Object`]: Value::Object
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// Borrows the string slice if the value is [`String`].
    ///
    /// [`String`]: Value::String
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        if let Self::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Borrows the map if the value is [`Object`].
    ///
    /// [`Object`]: Value::Object
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        if let Self::Object(map) = self {
            Some(map)
        } else {
            None
        }
    }

    /// Borrows the element vector if the value is [`Array`].
    ///
    /// [`Array`]: Value::Array
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        if let Self::Array(items) = self {
            Some(items)
        } else {
            None
        }
    }
}

/// Escapes a string for inclusion in a JSON string literal, writing to the
/// formatter. Quotes, backslashes and control characters below U+0020 are
/// replaced by their JSON escape sequences.
fn write_json_escaped<W: fmt::Write>(src: &str, f: &mut W) -> fmt::Result {
    for c in src.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if (c as u32) < 0x20 => write!(f, "\\u{:04X}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    Ok(())
}

impl fmt::Display for Value {
    /// Renders the value as compact JSON text, objects in insertion order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Integer(n) => write!(f, "{n}"),
            Value::BigInteger(n) => write!(f, "{n}"),
            Value::Double(n) => write!(f, "{n}"),
            Value::String(s) => {
                f.write_str("\"")?;
                write_json_escaped(s, f)?;
                f.write_str("\"")
            }
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                f.write_str("{")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    f.write_str("\"")?;
                    write_json_escaped(key, f)?;
                    write!(f, "\":{item}")?;
                }
                f.write_str("}")
            }
        }
    }
}
