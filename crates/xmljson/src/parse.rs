//! The projection engine: folds the token stream into a JSON object tree.

use alloc::borrow::ToOwned;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::mem;

use crate::coerce::coerce;
use crate::config::{XmlConfig, XsiTypeConverter};
use crate::error::{ParseError, SyntaxError};
use crate::tokenizer::{Tokenizer, XmlToken};
use crate::value::{Map, Value};

/// Per-element state while the element is open.
struct Frame {
    name: String,
    object: Map,
    /// Set by `xsi:nil="true"` when nil conversion is enabled; the element
    /// projects to `null` regardless of its content.
    nil: bool,
    /// Selected by a recognized `xsi:type` attribute; replaces the primitive
    /// coercer for this element's text.
    converter: Option<XsiTypeConverter>,
}

/// Parses an XML document into a JSON object.
///
/// The result typically holds one key, the root element's name; multiple
/// root elements and top-level CDATA merge into the same map. An empty
/// input yields an empty map.
///
/// # Errors
///
/// Returns [`ParseError`] for malformed markup or when the configured
/// nesting bound is exceeded.
///
/// # Examples
///
/// ```
/// use xmljson::{parse, Value, XmlConfig};
///
/// let doc = parse("<root>A &#8364;33</root>", &XmlConfig::default()).unwrap();
/// assert_eq!(doc["root"], Value::String("A €33".into()));
/// ```
pub fn parse(xml: &str, config: &XmlConfig) -> Result<Map, ParseError> {
    let mut tokenizer = Tokenizer::new(xml);
    let mut root = Map::default();
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        let Some(token) = tokenizer.next_token()? else {
            return match stack.pop() {
                None => Ok(root),
                Some(frame) => Err(tokenizer.error(SyntaxError::UnclosedTag(frame.name))),
            };
        };
        match token {
            XmlToken::StartElement { name, attrs } => {
                check_depth(config, stack.len())?;
                stack.push(open_frame(name, attrs, config));
            }
            XmlToken::EmptyElement { name, attrs } => {
                check_depth(config, stack.len())?;
                let frame = open_frame(name, attrs, config);
                let tag = frame.name.clone();
                let value = close_frame(frame, config);
                merge_element(parent_object(&mut stack, &mut root), &tag, value, config);
            }
            XmlToken::EndElement { name } => match stack.pop() {
                None => {
                    return Err(tokenizer.error(SyntaxError::MismatchedCloseTag(name)));
                }
                Some(frame) => {
                    if frame.name != name {
                        return Err(tokenizer.error(SyntaxError::MismatchedTags {
                            open: frame.name,
                            close: name,
                        }));
                    }
                    let tag = frame.name.clone();
                    let value = close_frame(frame, config);
                    merge_element(parent_object(&mut stack, &mut root), &tag, value, config);
                }
            },
            XmlToken::Text(text) => {
                // The tokenizer only surfaces text inside an element.
                if let Some(frame) = stack.last_mut() {
                    let value = match frame.converter {
                        Some(convert) => convert(&text),
                        None if config.keep_strings => Value::String(text),
                        None => coerce(&text),
                    };
                    accumulate(&mut frame.object, &config.cdata_tag_name, value);
                }
            }
            XmlToken::CData(body) => {
                let object = match stack.last_mut() {
                    Some(frame) => &mut frame.object,
                    None => &mut root,
                };
                accumulate(object, &config.cdata_tag_name, Value::String(body));
            }
        }
    }
}

fn check_depth(config: &XmlConfig, open: usize) -> Result<(), ParseError> {
    match config.max_nesting_depth {
        Some(max) if open >= max => Err(ParseError::DepthExceeded(max)),
        _ => Ok(()),
    }
}

fn parent_object<'s>(stack: &'s mut [Frame], root: &'s mut Map) -> &'s mut Map {
    match stack.last_mut() {
        Some(frame) => &mut frame.object,
        None => root,
    }
}

/// Opens a frame, interpreting `xsi:nil`/`xsi:type` and folding the
/// remaining attributes into the emerging object.
fn open_frame(name: String, attrs: Vec<(String, String)>, config: &XmlConfig) -> Frame {
    let mut frame = Frame {
        name,
        object: Map::default(),
        nil: false,
        converter: None,
    };
    for (attr, raw) in attrs {
        if config.convert_nil_to_null && attr == "xsi:nil" && raw.eq_ignore_ascii_case("true") {
            frame.nil = true;
        } else if !config.xsi_type_map.is_empty() && attr == "xsi:type" {
            match config.xsi_type_map.get(&raw) {
                Some(convert) => frame.converter = Some(convert),
                None => accumulate_attr(&mut frame.object, &attr, raw, config),
            }
        } else if !frame.nil {
            accumulate_attr(&mut frame.object, &attr, raw, config);
        }
    }
    frame
}

fn accumulate_attr(object: &mut Map, attr: &str, raw: String, config: &XmlConfig) {
    let value = if config.keep_strings {
        Value::String(raw)
    } else {
        coerce(&raw)
    };
    accumulate(object, attr, value);
}

/// Computes the projected value of a closing frame.
fn close_frame(frame: Frame, config: &XmlConfig) -> Value {
    if frame.nil {
        return Value::Null;
    }
    let mut object = frame.object;
    if object.is_empty() {
        return Value::String(String::new());
    }
    if object.len() == 1 {
        // An object holding nothing but accumulated text collapses to it.
        if let Some(content) = object.shift_remove(&config.cdata_tag_name) {
            return content;
        }
    }
    Value::Object(object)
}

/// Merges a value into an object under `key`: first occurrence inserts,
/// later occurrences promote to (or extend) an array.
fn accumulate(object: &mut Map, key: &str, value: Value) {
    match object.get_mut(key) {
        None => {
            object.insert(key.to_owned(), value);
        }
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let previous = mem::take(existing);
            *existing = Value::Array(vec![previous, value]);
        }
    }
}

/// Like [`accumulate`], but names in `force_list` always project as arrays.
fn merge_element(object: &mut Map, tag: &str, value: Value, config: &XmlConfig) {
    if config.force_list.contains(tag) && !object.contains_key(tag) {
        object.insert(tag.to_owned(), Value::Array(vec![value]));
    } else {
        accumulate(object, tag, value);
    }
}
