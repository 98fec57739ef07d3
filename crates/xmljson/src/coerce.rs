//! Optional string-to-primitive coercion for leaf text and attributes.

use alloc::borrow::ToOwned;

use num_bigint::BigInt;

use crate::value::Value;

/// Interprets leaf text as the most specific JSON primitive it spells.
///
/// `true`/`false`/`null` match ASCII case-insensitively. Integers admit an
/// optional leading `-` and decimal digits only, rejecting redundant leading
/// zeros (`"01"` stays a string); they land in `i64` when they fit and
/// promote to [`BigInt`] otherwise. Anything containing `.`, `e` or `E` is
/// tried as a double, rejecting non-finite results. Hex literals, a leading
/// `+` and surrounding whitespace are not recognized. Unconvertible input
/// comes back as a string.
pub(crate) fn coerce(text: &str) -> Value {
    if text.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }
    if text.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    match parse_number(text) {
        Some(value) => value,
        None => Value::String(text.to_owned()),
    }
}

fn parse_number(text: &str) -> Option<Value> {
    let first = text.chars().next()?;
    if !first.is_ascii_digit() && first != '-' {
        return None;
    }
    if text.contains(['.', 'e', 'E']) {
        let value: f64 = text.parse().ok()?;
        return value.is_finite().then_some(Value::Double(value));
    }
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || digits.bytes().any(|b| !b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    match text.parse::<i64>() {
        Ok(small) => Some(Value::Integer(small)),
        Err(_) => text.parse::<BigInt>().ok().map(Value::BigInteger),
    }
}
