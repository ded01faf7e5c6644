//! Blankness, length, joining and path lookup.

use serde_json::Value;

use super::{take, FunctionError};
use crate::path::{parse_path, resolve, PathSegment};
use crate::value::{is_blank, to_text};

pub(super) fn default_value(args: Vec<Value>) -> Result<Value, FunctionError> {
    let [value, fallback] = take("defaultValue", args)?;
    Ok(if is_blank(&value) { fallback } else { value })
}

pub(super) fn coalesce(args: Vec<Value>) -> Value {
    args.into_iter()
        .find(|v| !is_blank(v))
        .unwrap_or(Value::Null)
}

pub(super) fn blank(args: Vec<Value>) -> Result<Value, FunctionError> {
    let [value] = take("blank", args)?;
    Ok(Value::Bool(is_blank(&value)))
}

pub(super) fn present(args: Vec<Value>) -> Result<Value, FunctionError> {
    let [value] = take("present", args)?;
    Ok(Value::Bool(!is_blank(&value)))
}

pub(super) fn len(args: Vec<Value>) -> Result<Value, FunctionError> {
    let [value] = take("len", args)?;
    let n = match &value {
        Value::Null => 0,
        Value::String(s) => s.chars().count(),
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        other => return Err(FunctionError::unsupported("len", other)),
    };
    Ok(Value::from(n))
}

pub(super) fn join(args: Vec<Value>) -> Result<Value, FunctionError> {
    let [value, separator] = take("join", args)?;
    let separator = match &separator {
        Value::Array(_) | Value::Object(_) => {
            return Err(FunctionError::unsupported("join", &separator))
        }
        other => to_text(other),
    };
    let joined = match value {
        Value::Null => String::new(),
        Value::Array(items) => items
            .iter()
            .filter(|v| !v.is_null())
            .map(to_text)
            .collect::<Vec<_>>()
            .join(&separator),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}={}", k, to_text(v)))
            .collect::<Vec<_>>()
            .join(&separator),
        scalar => to_text(&scalar),
    };
    Ok(Value::String(joined))
}

pub(super) fn get(args: Vec<Value>) -> Result<Value, FunctionError> {
    let [root, path] = take("get", args)?;
    let segments = match &path {
        Value::Null => return Ok(Value::Null),
        Value::String(s) => parse_path(s.trim()).map_err(|e| FunctionError::Invalid {
            name: "get",
            message: e.to_string(),
        })?,
        Value::Number(n) => match n.as_i64() {
            Some(i) => vec![PathSegment::Index(i)],
            None => return Err(FunctionError::unsupported("get", &path)),
        },
        other => return Err(FunctionError::unsupported("get", other)),
    };
    if root.is_null() || segments.is_empty() {
        return Ok(Value::Null);
    }
    Ok(resolve(&root, &segments).cloned().unwrap_or(Value::Null))
}
