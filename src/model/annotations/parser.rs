//! Scanning of annotation source text.
//!
//! Signature files carry annotations as source text, e.g.
//! `@androidx.annotation.IntRange(from=5, to=10)` or `@Foo({"a", "b"})`. This module splits
//! such text into the annotation name and its attribute list and classifies attribute values.
//!
//! # Scanning rules
//!
//! The attribute scanner walks the text between the outer parentheses once, with a brace
//! depth counter and a string flag:
//!
//! - `{` / `}` adjust the depth; separators inside braces are not attribute boundaries
//! - `"` starts a string which ends at the next `"` not preceded by a backslash
//! - a `,` at depth zero outside a string closes the current attribute
//! - the first `=` at depth zero outside a string splits name from value
//!
//! Input comes from already-validated signature files, so the scanner never fails: unbalanced
//! braces or an unterminated string simply extend the current attribute to the end of input.
//! Backslashes are only special inside strings, not inside array braces.

use crate::model::annotations::types::{AnnotationAttribute, AnnotationValue};

/// A top-level span produced by [`split_top_level`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span<'a> {
    text: &'a str,
    /// Offset of the first top-level `=` inside `text`
    assignment: Option<usize>,
}

/// Splits `source` at top-level occurrences of `separator`.
///
/// Characters inside `"..."` strings and `{...}` braces never split. Each span records where
/// its first top-level `=` is, if any.
fn split_top_level(source: &str, separator: char) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut assignment = None;

    for (index, c) in source.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '=' if depth == 0 && assignment.is_none() => assignment = Some(index - start),
            c if c == separator && depth == 0 => {
                spans.push(Span {
                    text: &source[start..index],
                    assignment,
                });
                start = index + c.len_utf8();
                assignment = None;
            }
            _ => {}
        }
    }

    spans.push(Span {
        text: &source[start..],
        assignment,
    });
    spans
}

/// Parses the text between an annotation's outer parentheses into ordered attributes.
///
/// The name defaults to `value` when an attribute has no top-level `=`. Array values keep
/// their braces in [`AnnotationAttribute::raw_value`].
///
/// # Examples
///
/// ```rust
/// use apiscope::model::parse_attributes;
///
/// let attributes = parse_attributes("from=5, to=10");
/// assert_eq!(attributes[0].name, "from");
/// assert_eq!(attributes[1].raw_value, "10");
///
/// let attributes = parse_attributes(r#"value={"a","b"}"#);
/// assert_eq!(attributes.len(), 1);
/// assert_eq!(attributes[0].raw_value, r#"{"a","b"}"#);
/// ```
#[must_use]
pub fn parse_attributes(source: &str) -> Vec<AnnotationAttribute> {
    if source.trim().is_empty() {
        return Vec::new();
    }

    split_top_level(source, ',')
        .into_iter()
        .filter(|span| !span.text.trim().is_empty())
        .map(|span| match span.assignment {
            Some(offset) => {
                let name = span.text[..offset].trim();
                let value = span.text[offset + 1..].trim();
                AnnotationAttribute::new(if name.is_empty() { "value" } else { name }, value)
            }
            None => AnnotationAttribute::new("value", span.text.trim()),
        })
        .collect()
}

/// Splits annotation source text into its name and the raw attribute list.
///
/// The leading `@` is optional. The attribute list is the text between the first `(` and the
/// last `)`; it is `None` when the annotation has no parentheses.
///
/// ```rust
/// use apiscope::model::split_annotation_source;
///
/// assert_eq!(
///     split_annotation_source("@a.b.Size(min=1)"),
///     ("a.b.Size", Some("min=1"))
/// );
/// assert_eq!(split_annotation_source("@a.b.Keep"), ("a.b.Keep", None));
/// ```
#[must_use]
pub fn split_annotation_source(source: &str) -> (&str, Option<&str>) {
    let source = source.trim();
    let source = source.strip_prefix('@').unwrap_or(source);

    match source.find('(') {
        Some(open) => {
            let name = source[..open].trim();
            let close = source.rfind(')').filter(|close| *close > open);
            let attributes = match close {
                Some(close) => &source[open + 1..close],
                None => &source[open + 1..],
            };
            (name, Some(attributes))
        }
        None => (source, None),
    }
}

/// Classifies a raw attribute value.
///
/// Tries, in order: `true`/`false`, a quoted string, a quoted char, an array literal, a
/// numeric literal (integer first, then floating point); anything else is kept as source.
#[must_use]
pub fn classify_value(raw: &str) -> AnnotationValue {
    let value = raw.trim();

    match value {
        "true" => return AnnotationValue::Bool(true),
        "false" => return AnnotationValue::Bool(false),
        _ => {}
    }

    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        return AnnotationValue::String(unescape(&value[1..value.len() - 1]));
    }

    if value.len() >= 3 && value.starts_with('\'') && value.ends_with('\'') {
        let unescaped = unescape(&value[1..value.len() - 1]);
        let mut chars = unescaped.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return AnnotationValue::Char(c);
        }
    }

    if value.starts_with('{') && value.ends_with('}') {
        let inner = &value[1..value.len() - 1];
        if inner.trim().is_empty() {
            return AnnotationValue::Array(Vec::new());
        }
        return AnnotationValue::Array(
            split_top_level(inner, ',')
                .into_iter()
                .filter(|span| !span.text.trim().is_empty())
                .map(|span| classify_value(span.text))
                .collect(),
        );
    }

    parse_number(value).unwrap_or_else(|| AnnotationValue::Source(value.to_string()))
}

fn parse_number(value: &str) -> Option<AnnotationValue> {
    let first = value.chars().next()?;
    if !(first.is_ascii_digit() || first == '-' || first == '+' || first == '.') {
        return None;
    }

    let cleaned: String = value.chars().filter(|c| *c != '_').collect();
    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };

    let (digits, long_suffix) = match digits.strip_suffix(&['L', 'l'][..]) {
        Some(rest) => (rest, true),
        None => (digits, false),
    };

    let integer = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16).ok().map(|v| v as i64)
    } else if let Some(binary) = digits
        .strip_prefix("0b")
        .or_else(|| digits.strip_prefix("0B"))
    {
        u64::from_str_radix(binary, 2).ok().map(|v| v as i64)
    } else {
        digits.parse::<i64>().ok()
    };

    if let Some(integer) = integer {
        let integer = if negative {
            integer.wrapping_neg()
        } else {
            integer
        };
        if !long_suffix {
            if let Ok(int) = i32::try_from(integer) {
                return Some(AnnotationValue::Int(int));
            }
            // Hex int literals such as 0xFFFFFFFF are negative ints in Java
            if digits.len() <= 10 && digits.starts_with("0x") && integer <= i64::from(u32::MAX) {
                return Some(AnnotationValue::Int(integer as u32 as i32));
            }
        }
        return Some(AnnotationValue::Long(integer));
    }

    if long_suffix {
        return None;
    }

    let float = digits.strip_suffix(&['f', 'F', 'd', 'D'][..]).unwrap_or(digits);
    let parsed = float.parse::<f64>().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    Some(AnnotationValue::Double(if negative { -parsed } else { parsed }))
}

fn unescape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('b') => result.push('\u{8}'),
            Some('f') => result.push('\u{c}'),
            Some('0') => result.push('\0'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => result.push(decoded),
                    None => {
                        result.push_str("\\u");
                        result.push_str(&hex);
                    }
                }
            }
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }

    result
}
