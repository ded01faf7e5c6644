//! Best-effort conversions. These never fail on a value: anything unparsable yields the
//! caller's default.

use serde_json::Value;

use super::{take, FunctionError};
use crate::value::float_value;

/// Out-of-range numbers clamp to `i32::MIN..=i32::MAX` rather than wrapping.
pub(super) fn to_int(args: Vec<Value>) -> Result<Value, FunctionError> {
    let [value, default] = take("toInt", args)?;
    let parsed = match &value {
        Value::Number(n) => n
            .as_i64()
            .map(|i| i.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
            .or_else(|| n.as_f64().map(|f| f as i32)),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    Ok(parsed.map(Value::from).unwrap_or(default))
}

pub(super) fn to_long(args: Vec<Value>) -> Result<Value, FunctionError> {
    let [value, default] = take("toLong", args)?;
    let parsed = match &value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(parsed.map(Value::from).unwrap_or(default))
}

pub(super) fn to_double(args: Vec<Value>) -> Result<Value, FunctionError> {
    let [value, default] = take("toDouble", args)?;
    let parsed = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.and_then(float_value).unwrap_or(default))
}

pub(super) fn to_boolean(args: Vec<Value>) -> Result<Value, FunctionError> {
    let [value, default] = take("toBoolean", args)?;
    let parsed = match &value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    };
    Ok(parsed.map(Value::Bool).unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn to_int_parses_or_defaults() {
        assert_eq!(to_int(vec![json!(" 42 "), json!(0)]).unwrap(), json!(42));
        assert_eq!(to_int(vec![json!(7.9), json!(0)]).unwrap(), json!(7));
        assert_eq!(to_int(vec![json!("4.5"), json!(-1)]).unwrap(), json!(-1));
        assert_eq!(to_int(vec![json!("abc"), Value::Null]).unwrap(), Value::Null);
        assert_eq!(to_int(vec![json!(true), json!(3)]).unwrap(), json!(3));
        assert_eq!(
            to_int(vec![json!(10_000_000_000i64), json!(0)]).unwrap(),
            json!(i32::MAX)
        );
    }

    #[test]
    fn to_long_parses_or_defaults() {
        assert_eq!(
            to_long(vec![json!("10000000000"), json!(0)]).unwrap(),
            json!(10_000_000_000i64)
        );
        assert_eq!(to_long(vec![Value::Null, json!(9)]).unwrap(), json!(9));
        assert_eq!(to_long(vec![json!([1]), json!(9)]).unwrap(), json!(9));
    }

    #[test]
    fn to_int_clamps_out_of_range_numbers() {
        for (input, expected) in [
            (json!(2_147_483_648i64), i32::MAX),
            (json!(-2_147_483_649i64), i32::MIN),
            (json!(i64::MIN), i32::MIN),
            (json!(u64::MAX), i32::MAX),
            (json!(1e20), i32::MAX),
            (json!(-1e20), i32::MIN),
        ] {
            assert_eq!(
                to_int(vec![input.clone(), Value::Null]).unwrap(),
                json!(expected),
                "toInt({})",
                input
            );
        }
        assert_eq!(
            to_int(vec![json!("2147483648"), json!(-1)]).unwrap(),
            json!(-1)
        );
    }

    #[test]
    fn to_double_parses_or_defaults() {
        assert_eq!(to_double(vec![json!("2.5"), json!(0)]).unwrap(), json!(2.5));
        assert_eq!(to_double(vec![json!(3), json!(0)]).unwrap(), json!(3.0));
        assert_eq!(to_double(vec![json!("NaN"), json!(0.5)]).unwrap(), json!(0.5));
        assert_eq!(to_double(vec![json!("x"), json!(0.5)]).unwrap(), json!(0.5));
    }

    #[test]
    fn to_boolean_accepts_common_spellings() {
        for (input, expected) in [
            (json!("YES"), json!(true)),
            (json!("no"), json!(false)),
            (json!("1"), json!(true)),
            (json!(0), json!(false)),
            (json!(false), json!(false)),
        ] {
            assert_eq!(to_boolean(vec![input, Value::Null]).unwrap(), expected);
        }
        assert_eq!(to_boolean(vec![json!("maybe"), json!(true)]).unwrap(), json!(true));
        assert_eq!(to_boolean(vec![json!(""), json!(false)]).unwrap(), json!(false));
    }
}
