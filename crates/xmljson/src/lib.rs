//! A bidirectional codec between XML text and an in-memory JSON value tree.
//!
//! The forward direction ([`parse`]) tokenizes an XML document and projects
//! its element/attribute/text/CDATA structure onto a JSON object tree:
//! repeated child names collapse into arrays, mixed text accumulates under a
//! configurable synthetic key, and leaf text is optionally coerced to JSON
//! primitives. The reverse direction ([`serialize`]) flattens a JSON value
//! back into XML text. The projection is lossy by design, but deterministic:
//! two documents that differ only in ignorable syntax produce the same value.
//!
//! ```
//! use xmljson::{parse, Value, XmlConfig};
//!
//! let config = XmlConfig::default();
//! let doc = parse("<a><b>1</b><b>2</b><b>true</b></a>", &config).unwrap();
//! assert_eq!(Value::Object(doc).to_string(), r#"{"a":{"b":[1,2,true]}}"#);
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod coerce;
mod config;
mod entities;
mod error;
mod escape;
mod parse;
mod serialize;
mod source;
mod tokenizer;
mod value;

pub use config::{XmlConfig, XsiTypeConverter, XsiTypeMap};
pub use error::{ParseError, SyntaxError};
pub use escape::{escape, unescape};
pub use parse::parse;
pub use serialize::{serialize, serialize_indented};
pub use tokenizer::{Tokenizer, XmlToken};
pub use value::{Array, Map, Value};

#[cfg(test)]
mod tests;
