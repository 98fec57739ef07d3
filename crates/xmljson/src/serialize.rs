//! The inverse projection: JSON values back to XML text.

use alloc::string::{String, ToString};

use crate::config::XmlConfig;
use crate::escape::escape;
use crate::value::Value;

/// The tag synthesized for array elements that have no natural name.
const ARRAY_TAG: &str = "array";

/// Serializes a JSON value as XML text.
///
/// A map emits one element per key in insertion order; array values repeat
/// their key per element; the key equal to `cdata_tag_name` emits raw
/// escaped text. A scalar with a root tag wraps in that tag; without one it
/// renders as a quoted string, so a bare `null` produces the six characters
/// `"null"`. Tag-name validity is not enforced: keys are emitted verbatim.
///
/// # Examples
///
/// ```
/// use xmljson::{serialize, Value, XmlConfig};
///
/// let out = serialize(
///     &Value::String("1 < 2".into()),
///     Some("fact"),
///     &XmlConfig::default(),
/// );
/// assert_eq!(out, "<fact>1 &lt; 2</fact>");
/// ```
#[must_use]
pub fn serialize(value: &Value, tag_name: Option<&str>, config: &XmlConfig) -> String {
    serialize_indented(value, tag_name, config, 0)
}

/// Like [`serialize`], starting at the given indentation level (in spaces,
/// not factor multiples). Only meaningful with a non-zero `indent_factor`.
#[must_use]
pub fn serialize_indented(
    value: &Value,
    tag_name: Option<&str>,
    config: &XmlConfig,
    indent: usize,
) -> String {
    let mut out = String::new();
    write_value(&mut out, value, tag_name, config, indent);
    out
}

fn push_indent(out: &mut String, spaces: usize) {
    for _ in 0..spaces {
        out.push(' ');
    }
}

fn push_newline(out: &mut String, config: &XmlConfig) {
    if config.indent_factor > 0 {
        out.push('\n');
    }
}

fn open_tag(out: &mut String, tag: &str) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
}

fn close_tag(out: &mut String, tag: &str) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn empty_tag(out: &mut String, tag: &str, config: &XmlConfig) {
    if config.close_empty_tag {
        open_tag(out, tag);
        close_tag(out, tag);
    } else {
        out.push('<');
        out.push_str(tag);
        out.push_str("/>");
    }
}

/// The text a value contributes when it stands where XML expects character
/// data. Composites fall back to their JSON rendering.
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn write_value(out: &mut String, value: &Value, tag_name: Option<&str>, config: &XmlConfig, indent: usize) {
    match value {
        Value::Object(map) => {
            if let Some(tag) = tag_name {
                push_indent(out, indent);
                open_tag(out, tag);
                push_newline(out, config);
            }
            let inner = if tag_name.is_some() {
                indent + config.indent_factor
            } else {
                indent
            };
            for (key, child) in map {
                if *key == config.cdata_tag_name {
                    match child {
                        Value::Array(items) => {
                            for (i, item) in items.iter().enumerate() {
                                if i > 0 {
                                    out.push('\n');
                                }
                                out.push_str(&escape(&text_of(item)));
                            }
                        }
                        item => out.push_str(&escape(&text_of(item))),
                    }
                } else if let Value::Array(items) = child {
                    for item in items {
                        if item.is_array() {
                            // XML has no anonymous sequences; keep the key as
                            // the wrapper and let the nested elements take
                            // the synthetic tag.
                            open_tag(out, key);
                            write_value(out, item, None, config, inner);
                            close_tag(out, key);
                        } else {
                            write_value(out, item, Some(key.as_str()), config, inner);
                        }
                    }
                } else if matches!(child, Value::String(s) if s.is_empty()) {
                    push_indent(out, inner);
                    empty_tag(out, key, config);
                    push_newline(out, config);
                } else {
                    write_value(out, child, Some(key.as_str()), config, inner);
                }
            }
            if let Some(tag) = tag_name {
                push_indent(out, inner.saturating_sub(config.indent_factor));
                close_tag(out, tag);
                push_newline(out, config);
            }
        }
        Value::Array(items) => {
            let tag = tag_name.unwrap_or(ARRAY_TAG);
            for item in items {
                write_value(out, item, Some(tag), config, indent);
            }
        }
        scalar => {
            let text = match scalar {
                Value::Null => String::from("null"),
                other => escape(&text_of(other)),
            };
            push_indent(out, indent);
            match tag_name {
                None => {
                    out.push('"');
                    out.push_str(&text);
                    out.push('"');
                }
                Some(tag) if text.is_empty() => empty_tag(out, tag, config),
                Some(tag) => {
                    open_tag(out, tag);
                    out.push_str(&text);
                    close_tag(out, tag);
                }
            }
            push_newline(out, config);
        }
    }
}
