//! Presence checks and coercion of loosely typed request values.
//!
//! Request bodies arrive as arbitrary JSON (or form fields), so every field
//! is a [`serde_json::Value`] that may be absent, `null`, a number, a string
//! and so on. The rules here decide what counts as "present" and how a value
//! is turned into the string or boolean an [`Issue`](crate::model::Issue)
//! stores:
//!
//! - presence is truthiness: absent, `""`, `0`, `false` and `null` are falsy
//! - string fields take the loose string form of whatever was sent
//! - `open` is `true` only for `true` / `"true"`

use serde_json::{Map, Value};

/// A decoded request body or query: field name to loosely typed value.
pub type Fields = Map<String, Value>;

/// Truthiness of an optional value. Absent is falsy.
#[must_use]
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Whether a value counts as an update request: present and not `""`.
///
/// `null`, `false` and `0` do count; only absence and the empty string don't.
#[must_use]
pub fn is_update_value(value: Option<&Value>) -> bool {
    match value {
        None => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Loose string form of a JSON value: numbers without a trailing `.0`,
/// arrays comma-joined, objects as `[object Object]`.
#[must_use]
pub fn loose_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_string(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => loose_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn number_string(n: &serde_json::Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        // 3.0 prints as "3"
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Text stored in a string field for a supplied value. `null` blanks the field.
#[must_use]
pub fn field_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => loose_string(other),
    }
}

/// Coerce a supplied `open` value: `true` or `"true"` is open, anything else closed.
#[must_use]
pub fn coerce_open(value: &Value) -> bool {
    matches!(value, Value::Bool(true)) || matches!(value, Value::String(s) if s == "true")
}

/// Interpret an `open` query filter: case-insensitive `"true"`, else `false`.
#[must_use]
pub fn parse_open_filter(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}

/// Whether a stored id matches a client-supplied `_id`, compared as strings.
#[must_use]
pub fn id_matches(stored: &str, requested: &Value) -> bool {
    match requested {
        Value::String(s) => s == stored,
        other => loose_string(other) == stored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(null))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(0.0))));
        assert!(!is_truthy(Some(&json!(false))));

        assert!(is_truthy(Some(&json!("x"))));
        assert!(is_truthy(Some(&json!(7))));
        assert!(is_truthy(Some(&json!(true))));
        assert!(is_truthy(Some(&json!([]))));
        assert!(is_truthy(Some(&json!({}))));
    }

    #[test]
    fn test_update_value_only_rejects_absent_and_empty() {
        assert!(!is_update_value(None));
        assert!(!is_update_value(Some(&json!(""))));
        assert!(is_update_value(Some(&json!(null))));
        assert!(is_update_value(Some(&json!(false))));
        assert!(is_update_value(Some(&json!(0))));
        assert!(is_update_value(Some(&json!("text"))));
    }

    #[test]
    fn test_loose_string_forms() {
        assert_eq!(loose_string(&json!("abc")), "abc");
        assert_eq!(loose_string(&json!(5)), "5");
        assert_eq!(loose_string(&json!(-3)), "-3");
        assert_eq!(loose_string(&json!(3.0)), "3");
        assert_eq!(loose_string(&json!(1.5)), "1.5");
        assert_eq!(loose_string(&json!(true)), "true");
        assert_eq!(loose_string(&json!(null)), "null");
        assert_eq!(loose_string(&json!([1, "a", null])), "1,a,");
        assert_eq!(loose_string(&json!({"k": 1})), "[object Object]");
    }

    #[test]
    fn test_field_text_blanks_null() {
        assert_eq!(field_text(&json!(null)), "");
        assert_eq!(field_text(&json!(12)), "12");
    }

    #[test]
    fn test_open_coercion() {
        assert!(coerce_open(&json!(true)));
        assert!(coerce_open(&json!("true")));
        assert!(!coerce_open(&json!("TRUE")));
        assert!(!coerce_open(&json!(false)));
        assert!(!coerce_open(&json!("false")));
        assert!(!coerce_open(&json!(1)));
        assert!(!coerce_open(&json!(null)));
    }

    #[test]
    fn test_open_filter_is_case_insensitive() {
        assert!(parse_open_filter("true"));
        assert!(parse_open_filter("TRUE"));
        assert!(parse_open_filter("True"));
        assert!(!parse_open_filter("false"));
        assert!(!parse_open_filter("yes"));
        assert!(!parse_open_filter(""));
    }

    #[test]
    fn test_id_matches_by_string_form() {
        assert!(id_matches("ABC", &json!("ABC")));
        assert!(!id_matches("ABC", &json!("abc")));
        assert!(id_matches("123", &json!(123)));
        assert!(!id_matches("123", &json!(124)));
    }
}
