//! Clock and date functions.

use serde_json::Value;

use super::{integer_arg, optional_text_arg, take, FunctionError};
use crate::clock::Clock;
use crate::date::{self, TimeUnit};

pub(super) fn now(args: Vec<Value>, clock: &dyn Clock) -> Result<Value, FunctionError> {
    let [pattern] = take("now", args)?;
    let pattern = optional_text_arg("now", &pattern)?;
    let current = clock.now().naive_local();
    date::format(&current, pattern.as_deref())
        .map(Value::String)
        .map_err(|e| FunctionError::date("now", e))
}

pub(super) fn now_millis(clock: &dyn Clock) -> Value {
    Value::from(clock.now().timestamp_millis())
}

pub(super) fn now_seconds(clock: &dyn Clock) -> Value {
    Value::from(clock.now().timestamp())
}

pub(super) fn format_date(args: Vec<Value>) -> Result<Value, FunctionError> {
    let [value, pattern] = take("formatDate", args)?;
    let pattern = optional_text_arg("formatDate", &pattern)?;
    let Some(parsed) = date::read_value(&value).map_err(|e| FunctionError::date("formatDate", e))?
    else {
        return Ok(Value::String(String::new()));
    };
    date::format(&parsed, pattern.as_deref())
        .map(Value::String)
        .map_err(|e| FunctionError::date("formatDate", e))
}

/// `dateAdd` and, with `subtract`, `dateSub`. Null or unparsable dates render as `""`.
pub(super) fn date_add(args: Vec<Value>, subtract: bool) -> Result<Value, FunctionError> {
    let name = if subtract { "dateSub" } else { "dateAdd" };
    let [value, amount, unit, pattern] = take(name, args)?;

    let amount = integer_arg(name, &amount)?;
    let amount = if subtract {
        amount.checked_neg().ok_or_else(|| FunctionError::date(name, date::DateError::OutOfRange))?
    } else {
        amount
    };
    let unit = match optional_text_arg(name, &unit)? {
        None => TimeUnit::Days,
        Some(raw) => TimeUnit::parse(&raw).map_err(|e| FunctionError::date(name, e))?,
    };
    let pattern = optional_text_arg(name, &pattern)?;

    let Some(parsed) = date::read_value(&value).map_err(|e| FunctionError::date(name, e))? else {
        return Ok(Value::String(String::new()));
    };
    let shifted = date::shift(parsed, amount, unit).map_err(|e| FunctionError::date(name, e))?;
    date::format(&shifted, pattern.as_deref())
        .map(Value::String)
        .map_err(|e| FunctionError::date(name, e))
}
