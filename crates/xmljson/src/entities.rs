//! Decoding of named and numeric character references.

use alloc::string::{String, ToString};

/// The five predefined XML entities. Lookup is exact: callers wanting
/// case-insensitive matching fold the name first.
pub(crate) fn named_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "apos" => Some('\''),
        "gt" => Some('>'),
        "lt" => Some('<'),
        "quot" => Some('"'),
        _ => None,
    }
}

/// Resolves an entity body (the text between `&` and `;`).
///
/// `#NNN`, `#xHH` and `#XHH` are numeric references; anything else is looked
/// up as a named entity. Returns `None` when the reference is unknown or its
/// digits do not parse, in which case callers preserve the reference text
/// verbatim. A numeric reference that parses to a surrogate half or an
/// out-of-range code point yields U+FFFD: such scalars cannot be represented,
/// and pairing logic is deliberately absent.
pub(crate) fn resolve_entity(body: &str) -> Option<String> {
    if let Some(numeric) = body.strip_prefix('#') {
        let (digits, radix) = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => (hex, 16),
            None => (numeric, 10),
        };
        let cp = u32::from_str_radix(digits, radix).ok()?;
        Some(char::from_u32(cp).unwrap_or('\u{FFFD}').to_string())
    } else {
        named_entity(body).map(|c| c.to_string())
    }
}
