//! Helpers over [`serde_json::Value`], the binding type for template input.
//!
//! Blankness, truthiness and text conversion are shared by the function library, the
//! operators and the renderer so that `fn.blank`, `{{#if}}` and output text agree.

use serde_json::Value;

/// True for null, whitespace-only strings, empty arrays and empty maps.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Condition truthiness for `{{#if}}`, `!`, `&&`, `||` and the ternary operator.
///
/// Strings `"false"` (any case) and `"0"` are false, as are blank values and zero.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => {
            let s = s.trim();
            !s.is_empty() && !s.eq_ignore_ascii_case("false") && s != "0"
        }
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Text form of a value as it appears in rendered output.
///
/// Strings are emitted raw, null as the empty string, everything else as compact JSON.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Short type label used in error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "map",
    }
}

/// Structural equality with numeric comparison across integer and float representations.
pub fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => a.as_f64() == b.as_f64(),
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| loose_eq(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k).map(|w| loose_eq(v, w)).unwrap_or(false))
        }
        _ => left == right,
    }
}

/// Wraps an `f64` as a JSON float. `None` for NaN and infinities, which JSON cannot represent.
pub fn float_value(f: f64) -> Option<Value> {
    serde_json::Number::from_f64(f).map(Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_covers_null_empty_and_whitespace() {
        assert!(is_blank(&Value::Null));
        assert!(is_blank(&json!("")));
        assert!(is_blank(&json!("   ")));
        assert!(is_blank(&json!([])));
        assert!(is_blank(&json!({})));
        assert!(!is_blank(&json!(0)));
        assert!(!is_blank(&json!(false)));
        assert!(!is_blank(&json!(["x"])));
    }

    #[test]
    fn truthiness_of_strings_and_numbers() {
        assert!(is_truthy(&json!("yes")));
        assert!(!is_truthy(&json!("FALSE")));
        assert!(!is_truthy(&json!("0")));
        assert!(!is_truthy(&json!(0.0)));
        assert!(is_truthy(&json!(-1)));
        assert!(!is_truthy(&json!({})));
    }

    #[test]
    fn text_form_of_values() {
        assert_eq!(to_text(&Value::Null), "");
        assert_eq!(to_text(&json!("a b")), "a b");
        assert_eq!(to_text(&json!(5)), "5");
        assert_eq!(to_text(&json!(true)), "true");
        assert_eq!(to_text(&json!([1, "x"])), "[1,\"x\"]");
    }

    #[test]
    fn loose_eq_compares_numbers_by_value() {
        assert!(loose_eq(&json!(1), &json!(1.0)));
        assert!(loose_eq(&json!({"a": [1, 2]}), &json!({"a": [1.0, 2]})));
        assert!(!loose_eq(&json!("1"), &json!(1)));
    }

    #[test]
    fn float_value_keeps_floats_and_rejects_non_finite() {
        assert_eq!(float_value(3.0), Some(json!(3.0)));
        assert_eq!(to_text(&float_value(2.5).unwrap()), "2.5");
        assert_eq!(float_value(f64::NAN), None);
        assert_eq!(float_value(f64::INFINITY), None);
    }
}
