//! The `fn.*` function catalog: name, signature and description of every function callable
//! inside a template expression, plus the accepted argument counts.
//!
//! The catalog is built once and only read afterwards. Authoring tools list it through
//! [`function_docs`]; the evaluator checks names and arity against [`find_function`] before
//! dispatching, so the documented set and the executable set cannot drift apart.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Documentation entry for one template function (wire shape of the catalog endpoint).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptFunctionDoc {
    pub name: String,
    pub signature: String,
    pub description: String,
}

/// Accepted argument count for a function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exact(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }

    pub fn describe(&self) -> String {
        match *self {
            Arity::Exact(1) => "1 argument".to_string(),
            Arity::Exact(n) => format!("{} arguments", n),
            Arity::AtLeast(1) => "at least 1 argument".to_string(),
            Arity::AtLeast(n) => format!("at least {} arguments", n),
        }
    }
}

/// Catalog entry: documentation plus arity.
#[derive(Clone, Copy, Debug)]
pub struct FunctionSpec {
    pub name: &'static str,
    pub signature: &'static str,
    pub description: &'static str,
    pub arity: Arity,
}

const CATALOG: &[FunctionSpec] = &[
    FunctionSpec {
        name: "defaultValue",
        signature: "fn.defaultValue(value, fallback)",
        description: "Returns fallback when value is blank (null, blank string, empty list or map)",
        arity: Arity::Exact(2),
    },
    FunctionSpec {
        name: "coalesce",
        signature: "fn.coalesce(v1, v2, ...)",
        description: "Returns the first non-blank argument",
        arity: Arity::AtLeast(1),
    },
    FunctionSpec {
        name: "blank",
        signature: "fn.blank(value)",
        description: "True for null, blank string, empty list or empty map",
        arity: Arity::Exact(1),
    },
    FunctionSpec {
        name: "present",
        signature: "fn.present(value)",
        description: "True when value is not blank",
        arity: Arity::Exact(1),
    },
    FunctionSpec {
        name: "len",
        signature: "fn.len(value)",
        description: "Length of a string, list or map",
        arity: Arity::Exact(1),
    },
    FunctionSpec {
        name: "join",
        signature: "fn.join(value, separator)",
        description: "Joins list elements with separator",
        arity: Arity::Exact(2),
    },
    FunctionSpec {
        name: "get",
        signature: "fn.get(root, \"path.to[0].value\")",
        description: "Reads a value by path; null when any segment is missing",
        arity: Arity::Exact(2),
    },
    FunctionSpec {
        name: "replace",
        signature: "fn.replace(text, target, replacement)",
        description: "Replaces every occurrence of target",
        arity: Arity::Exact(3),
    },
    FunctionSpec {
        name: "substring",
        signature: "fn.substring(text, begin, endExclusive)",
        description: "Substring with indices clamped to the text bounds",
        arity: Arity::Exact(3),
    },
    FunctionSpec {
        name: "toInt",
        signature: "fn.toInt(value, defaultValue)",
        description: "Converts to a 32-bit integer (fractions truncated, out-of-range values clamped to the 32-bit bounds), defaultValue when not parsable",
        arity: Arity::Exact(2),
    },
    FunctionSpec {
        name: "toLong",
        signature: "fn.toLong(value, defaultValue)",
        description: "Converts to a 64-bit integer (fractions truncated, out-of-range values clamped to the 64-bit bounds), defaultValue when not parsable",
        arity: Arity::Exact(2),
    },
    FunctionSpec {
        name: "toDouble",
        signature: "fn.toDouble(value, defaultValue)",
        description: "Converts to a floating point number, defaultValue when not parsable",
        arity: Arity::Exact(2),
    },
    FunctionSpec {
        name: "toBoolean",
        signature: "fn.toBoolean(value, defaultValue)",
        description: "Converts true/false/yes/no/1/0 to a boolean, defaultValue otherwise",
        arity: Arity::Exact(2),
    },
    FunctionSpec {
        name: "now",
        signature: "fn.now('yyyy-MM-dd HH:mm:ss')",
        description: "Current local time formatted with the pattern",
        arity: Arity::Exact(1),
    },
    FunctionSpec {
        name: "nowMillis",
        signature: "fn.nowMillis()",
        description: "Current epoch time in milliseconds",
        arity: Arity::Exact(0),
    },
    FunctionSpec {
        name: "nowSeconds",
        signature: "fn.nowSeconds()",
        description: "Current epoch time in seconds",
        arity: Arity::Exact(0),
    },
    FunctionSpec {
        name: "formatDate",
        signature: "fn.formatDate(value, 'yyyy-MM-dd')",
        description: "Formats epoch millis or an ISO date/time string",
        arity: Arity::Exact(2),
    },
    FunctionSpec {
        name: "dateAdd",
        signature: "fn.dateAdd(value, 3, 'days', 'yyyy-MM-dd')",
        description: "Adds an amount of a unit to a date, then formats it",
        arity: Arity::Exact(4),
    },
    FunctionSpec {
        name: "dateSub",
        signature: "fn.dateSub(value, 3, 'days', 'yyyy-MM-dd')",
        description: "Subtracts an amount of a unit from a date, then formats it",
        arity: Arity::Exact(4),
    },
    FunctionSpec {
        name: "json",
        signature: "fn.json(value)",
        description: "Serializes a value to compact JSON",
        arity: Arity::Exact(1),
    },
    FunctionSpec {
        name: "trim",
        signature: "fn.trim(value)",
        description: "Removes leading and trailing whitespace",
        arity: Arity::Exact(1),
    },
    FunctionSpec {
        name: "upper",
        signature: "fn.upper(value)",
        description: "Converts to upper case",
        arity: Arity::Exact(1),
    },
    FunctionSpec {
        name: "lower",
        signature: "fn.lower(value)",
        description: "Converts to lower case",
        arity: Arity::Exact(1),
    },
];

static DOCS: Lazy<Vec<PromptFunctionDoc>> = Lazy::new(|| {
    CATALOG
        .iter()
        .map(|spec| PromptFunctionDoc {
            name: spec.name.to_string(),
            signature: spec.signature.to_string(),
            description: spec.description.to_string(),
        })
        .collect()
});

static NAMES: Lazy<Vec<&'static str>> = Lazy::new(|| CATALOG.iter().map(|s| s.name).collect());

/// Every catalog entry, in catalog order.
pub fn function_specs() -> &'static [FunctionSpec] {
    CATALOG
}

/// Documentation entries for display and autocomplete.
pub fn function_docs() -> &'static [PromptFunctionDoc] {
    &DOCS
}

/// Function names in catalog order.
pub fn function_names() -> &'static [&'static str] {
    &NAMES
}

/// Looks up a function by its exact (case-sensitive) name.
pub fn find_function(name: &str) -> Option<&'static FunctionSpec> {
    CATALOG.iter().find(|spec| spec.name == name)
}
