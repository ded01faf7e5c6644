//! String functions. Non-string input is converted with [`to_text`] first.

use serde_json::Value;

use super::{integer_arg, take, FunctionError};
use crate::value::to_text;

pub(super) fn replace(args: Vec<Value>) -> Result<Value, FunctionError> {
    let [text, target, replacement] = take("replace", args)?;
    let text = to_text(&text);
    let target = to_text(&target);
    if target.is_empty() {
        return Ok(Value::String(text));
    }
    Ok(Value::String(text.replace(&target, &to_text(&replacement))))
}

/// Char-indexed substring; `begin` and `end` are clamped into `0..=len` and `end >= begin`.
pub(super) fn substring(args: Vec<Value>) -> Result<Value, FunctionError> {
    let [text, begin, end] = take("substring", args)?;
    let text = to_text(&text);
    let begin = integer_arg("substring", &begin)?;
    let end = integer_arg("substring", &end)?;

    let len = text.chars().count() as i64;
    let start = begin.clamp(0, len);
    let stop = end.clamp(start, len);
    let out: String = text
        .chars()
        .skip(start as usize)
        .take((stop - start) as usize)
        .collect();
    Ok(Value::String(out))
}

pub(super) fn json(args: Vec<Value>) -> Result<Value, FunctionError> {
    let [value] = take("json", args)?;
    serde_json::to_string(&value)
        .map(Value::String)
        .map_err(|e| FunctionError::Invalid {
            name: "json",
            message: e.to_string(),
        })
}

pub(super) fn trim(args: Vec<Value>) -> Result<Value, FunctionError> {
    let [value] = take("trim", args)?;
    Ok(Value::String(to_text(&value).trim().to_string()))
}

pub(super) fn upper(args: Vec<Value>) -> Result<Value, FunctionError> {
    let [value] = take("upper", args)?;
    Ok(Value::String(to_text(&value).to_uppercase()))
}

pub(super) fn lower(args: Vec<Value>) -> Result<Value, FunctionError> {
    let [value] = take("lower", args)?;
    Ok(Value::String(to_text(&value).to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn replace_all_occurrences_literally() {
        assert_eq!(
            replace(vec![json!("a.b.c"), json!("."), json!("/")]).unwrap(),
            json!("a/b/c")
        );
        assert_eq!(
            replace(vec![json!("abc"), json!(""), json!("x")]).unwrap(),
            json!("abc")
        );
        assert_eq!(
            replace(vec![json!("abc"), json!("b"), Value::Null]).unwrap(),
            json!("ac")
        );
        assert_eq!(
            replace(vec![Value::Null, json!("b"), json!("x")]).unwrap(),
            json!("")
        );
    }

    #[test]
    fn substring_clamps_out_of_range() {
        let call = |b: Value, e: Value| substring(vec![json!("hello"), b, e]).unwrap();
        assert_eq!(call(json!(1), json!(3)), json!("el"));
        assert_eq!(call(json!(-5), json!(2)), json!("he"));
        assert_eq!(call(json!(3), json!(100)), json!("lo"));
        assert_eq!(call(json!(4), json!(1)), json!(""));
        assert_eq!(call(json!(10), json!(20)), json!(""));
    }

    #[test]
    fn substring_counts_chars_not_bytes() {
        assert_eq!(
            substring(vec![json!("日本語テキスト"), json!(1), json!(3)]).unwrap(),
            json!("本語")
        );
    }

    #[test]
    fn substring_rejects_non_numeric_bounds() {
        assert!(substring(vec![json!("abc"), json!("x"), json!(1)]).is_err());
        assert!(substring(vec![json!("abc"), json!(0), json!([1])]).is_err());
    }

    #[test]
    fn json_is_compact() {
        assert_eq!(
            json(vec![json!({"a": [1, "x"]})]).unwrap(),
            json!("{\"a\":[1,\"x\"]}")
        );
        assert_eq!(json(vec![Value::Null]).unwrap(), json!("null"));
    }

    #[test]
    fn case_and_trim_coerce_to_text() {
        assert_eq!(trim(vec![json!("  hi \n")]).unwrap(), json!("hi"));
        assert_eq!(upper(vec![json!("abc")]).unwrap(), json!("ABC"));
        assert_eq!(lower(vec![json!("ÀB")]).unwrap(), json!("àb"));
        assert_eq!(upper(vec![json!(true)]).unwrap(), json!("TRUE"));
        assert_eq!(trim(vec![Value::Null]).unwrap(), json!(""));
    }
}
