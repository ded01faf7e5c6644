//! Executable side of the `fn.*` catalog.
//!
//! [`call`] checks the argument count against [`crate::catalog`] and dispatches by name.
//! Function bodies are pure apart from the clock; they take ownership of their evaluated
//! arguments and return a new value or a [`FunctionError`].

mod coerce;
mod collection;
mod text;
mod time;

use serde_json::Value;
use thiserror::Error;

use crate::catalog::find_function;
use crate::clock::Clock;
use crate::date::DateError;
use crate::value::type_name;

/// Failure inside a template function; reported as `FUNCTION_ERROR`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FunctionError {
    #[error("unknown function fn.{0}")]
    Unknown(String),
    #[error("fn.{name} expects {expected}, got {actual}")]
    Arity {
        name: &'static str,
        expected: String,
        actual: usize,
    },
    #[error("fn.{name} does not support a {kind} argument")]
    UnsupportedOperand {
        name: &'static str,
        kind: &'static str,
    },
    #[error("fn.{name}: {message}")]
    Invalid { name: &'static str, message: String },
}

impl FunctionError {
    pub(crate) fn unsupported(name: &'static str, value: &Value) -> Self {
        FunctionError::UnsupportedOperand {
            name,
            kind: type_name(value),
        }
    }

    pub(crate) fn date(name: &'static str, err: DateError) -> Self {
        match err {
            DateError::UnsupportedValue(kind) => FunctionError::UnsupportedOperand { name, kind },
            other => FunctionError::Invalid {
                name,
                message: other.to_string(),
            },
        }
    }
}

/// Calls `fn.<name>` with already evaluated arguments.
pub fn call(name: &str, args: Vec<Value>, clock: &dyn Clock) -> Result<Value, FunctionError> {
    let spec = find_function(name).ok_or_else(|| FunctionError::Unknown(name.to_string()))?;
    if !spec.arity.accepts(args.len()) {
        return Err(FunctionError::Arity {
            name: spec.name,
            expected: spec.arity.describe(),
            actual: args.len(),
        });
    }
    tracing::trace!(function = spec.name, argc = args.len(), "call template function");

    match spec.name {
        "defaultValue" => collection::default_value(args),
        "coalesce" => Ok(collection::coalesce(args)),
        "blank" => collection::blank(args),
        "present" => collection::present(args),
        "len" => collection::len(args),
        "join" => collection::join(args),
        "get" => collection::get(args),
        "replace" => text::replace(args),
        "substring" => text::substring(args),
        "json" => text::json(args),
        "trim" => text::trim(args),
        "upper" => text::upper(args),
        "lower" => text::lower(args),
        "toInt" => coerce::to_int(args),
        "toLong" => coerce::to_long(args),
        "toDouble" => coerce::to_double(args),
        "toBoolean" => coerce::to_boolean(args),
        "now" => time::now(args, clock),
        "nowMillis" => Ok(time::now_millis(clock)),
        "nowSeconds" => Ok(time::now_seconds(clock)),
        "formatDate" => time::format_date(args),
        "dateAdd" => time::date_add(args, false),
        "dateSub" => time::date_add(args, true),
        other => Err(FunctionError::Unknown(other.to_string())),
    }
}

/// Moves exactly `N` arguments out of `args`.
pub(crate) fn take<const N: usize>(
    name: &'static str,
    args: Vec<Value>,
) -> Result<[Value; N], FunctionError> {
    let actual = args.len();
    args.try_into().map_err(|_| FunctionError::Arity {
        name,
        expected: crate::catalog::Arity::Exact(N).describe(),
        actual,
    })
}

/// Reads an integer argument: numbers (floats truncate) or numeric strings.
pub(crate) fn integer_arg(name: &'static str, value: &Value) -> Result<i64, FunctionError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| FunctionError::unsupported(name, value)),
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| FunctionError::Invalid {
            name,
            message: format!("`{}` is not an integer", s),
        }),
        other => Err(FunctionError::unsupported(name, other)),
    }
}

/// Reads an optional text argument (pattern, unit); null maps to `None`.
pub(crate) fn optional_text_arg(
    name: &'static str,
    value: &Value,
) -> Result<Option<String>, FunctionError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        other => Err(FunctionError::unsupported(name, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::function_specs;
    use crate::clock::SystemClock;
    use serde_json::json;

    #[test]
    fn every_catalog_entry_dispatches() {
        for spec in function_specs() {
            let argc = match spec.arity {
                crate::catalog::Arity::Exact(n) => n,
                crate::catalog::Arity::AtLeast(n) => n,
            };
            let args = vec![Value::Null; argc];
            let result = call(spec.name, args, &SystemClock);
            assert!(
                !matches!(result, Err(FunctionError::Unknown(_))),
                "fn.{} is documented but not executable",
                spec.name
            );
        }
    }

    #[test]
    fn arity_is_checked_before_dispatch() {
        let err = call("len", vec![json!("a"), json!("b")], &SystemClock).unwrap_err();
        assert_eq!(
            err,
            FunctionError::Arity {
                name: "len",
                expected: "1 argument".to_string(),
                actual: 2
            }
        );
        assert_eq!(err.to_string(), "fn.len expects 1 argument, got 2");
        assert!(matches!(
            call("coalesce", vec![], &SystemClock),
            Err(FunctionError::Arity { .. })
        ));
    }

    #[test]
    fn unknown_name() {
        assert_eq!(
            call("explode", vec![], &SystemClock),
            Err(FunctionError::Unknown("explode".to_string()))
        );
    }

    #[test]
    fn integer_arg_forms() {
        assert_eq!(integer_arg("substring", &json!(3)).unwrap(), 3);
        assert_eq!(integer_arg("substring", &json!(3.9)).unwrap(), 3);
        assert_eq!(integer_arg("substring", &json!(" -2 ")).unwrap(), -2);
        assert!(matches!(
            integer_arg("substring", &json!("x")),
            Err(FunctionError::Invalid { .. })
        ));
        assert!(matches!(
            integer_arg("substring", &Value::Null),
            Err(FunctionError::UnsupportedOperand { kind: "null", .. })
        ));
    }
}
