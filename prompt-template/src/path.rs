//! Dotted/bracketed path lookup used by `fn.get`: `a.b[0].c`, `a['key with.dot']`.

use serde_json::Value;
use thiserror::Error;

/// One step of a parsed path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(i64),
}

/// Malformed path text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("unclosed '[' in path `{0}`")]
    UnclosedBracket(String),
    #[error("invalid index `{index}` in path `{path}`")]
    InvalidIndex { path: String, index: String },
}

/// Splits `path` into segments.
///
/// Dots separate keys, `[n]` selects an index and `['k']` / `["k"]` selects a key verbatim.
/// Empty segments (`a..b`, leading dot) are skipped.
pub fn parse_path(path: &str) -> Result<Vec<PathSegment>, PathError> {
    let mut segments = Vec::new();
    let mut token = String::new();
    let mut rest = path;

    while let Some(c) = rest.chars().next() {
        match c {
            '.' => {
                flush(&mut token, &mut segments);
                rest = &rest[1..];
            }
            '[' => {
                flush(&mut token, &mut segments);
                let close = rest
                    .find(']')
                    .ok_or_else(|| PathError::UnclosedBracket(path.to_string()))?;
                let inner = rest[1..close].trim();
                segments.push(bracket_segment(path, inner)?);
                rest = &rest[close + 1..];
            }
            _ => {
                token.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    flush(&mut token, &mut segments);
    Ok(segments)
}

fn flush(token: &mut String, segments: &mut Vec<PathSegment>) {
    if !token.is_empty() {
        segments.push(PathSegment::Key(std::mem::take(token)));
    }
}

fn bracket_segment(path: &str, inner: &str) -> Result<PathSegment, PathError> {
    for quote in ['\'', '"'] {
        if inner.len() >= 2 && inner.starts_with(quote) && inner.ends_with(quote) {
            return Ok(PathSegment::Key(inner[1..inner.len() - 1].to_string()));
        }
    }
    inner
        .parse::<i64>()
        .map(PathSegment::Index)
        .map_err(|_| PathError::InvalidIndex {
            path: path.to_string(),
            index: inner.to_string(),
        })
}

/// Follows `segments` from `root`. Any missing step yields `None`; never fails.
pub fn resolve<'a>(root: &'a Value, segments: &[PathSegment]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(root, |current, segment| step(current, segment))
}

/// One navigation step: key on a map, index on an array.
pub fn step<'a>(current: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match (current, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get(key),
        (Value::Array(items), PathSegment::Index(i)) => {
            usize::try_from(*i).ok().and_then(|i| items.get(i))
        }
        _ => None,
    }
}
