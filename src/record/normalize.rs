use crate::core::{Row, Value};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_DIGITS: Regex = Regex::new(r"\D+").expect("valid regex");
}

/// Populate-time normalization of the well-known fields.
///
/// Each step is guarded by the field being present and non-null, so entity
/// types that do not declare these fields are unaffected. Returns the
/// derived display name when both name fields were normalized.
///
/// Every step is idempotent: re-normalizing already-normalized values is a
/// no-op.
pub(crate) fn apply(fields: &mut Row) -> Option<String> {
    if let Some(Value::Text(raw)) = fields.get("phone") {
        if let Some(formatted) = format_phone(raw) {
            fields.insert("phone".to_string(), Value::Text(formatted));
        }
    }

    if let Some(Value::Text(raw)) = fields.get("email") {
        let lowered = raw.to_lowercase();
        fields.insert("email".to_string(), Value::Text(lowered));
    }

    let first = match fields.get("first") {
        Some(Value::Text(s)) => Some(title_case(s, is_first_boundary)),
        _ => None,
    };
    let last = match fields.get("last") {
        Some(Value::Text(s)) => Some(title_case(s, is_last_boundary)),
        _ => None,
    };
    if let (Some(first), Some(last)) = (first, last) {
        let display_name = format!("{first} {last}");
        fields.insert("first".to_string(), Value::Text(first));
        fields.insert("last".to_string(), Value::Text(last));
        return Some(display_name);
    }
    None
}

/// Reformat the first ten digits, read left-to-right ignoring non-digit
/// separators, as `(ddd) ddd-dddd`. Strings with fewer than ten digits are
/// left untouched.
pub(crate) fn format_phone(raw: &str) -> Option<String> {
    let digits = NON_DIGITS.replace_all(raw, "");
    if digits.len() < 10 {
        return None;
    }
    Some(format!(
        "({}) {}-{}",
        &digits[..3],
        &digits[3..6],
        &digits[6..10]
    ))
}

fn is_first_boundary(c: char) -> bool {
    c.is_whitespace()
}

// The last name also breaks on hyphenation and parenthesized suffixes.
fn is_last_boundary(c: char) -> bool {
    c.is_whitespace() || c == '-' || c == '('
}

/// Lowercase the input and capitalize the character after every boundary
fn title_case(input: &str, is_boundary: fn(char) -> bool) -> String {
    let mut out = String::with_capacity(input.len());
    let mut at_boundary = true;
    for ch in input.chars() {
        if is_boundary(ch) {
            at_boundary = true;
            out.push(ch);
        } else if at_boundary {
            out.extend(ch.to_uppercase());
            at_boundary = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}
