//! Command-line documents: `--input`, `--ctx`, `--template-file` and `preview --request`.
//!
//! A source argument is either literal text, `@path` (read the file) or `-` (read stdin).
//! Documents are parsed as JSON first, then as YAML.

use std::io::Read;
use std::path::Path;

use prompt_template::PreviewRequest;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::CliError;

/// Text of a source argument: `-` is stdin, `@path` is a file, anything else is literal.
pub fn read_source(arg: &str) -> Result<String, CliError> {
    if arg == "-" {
        return read_stdin();
    }
    match arg.strip_prefix('@') {
        Some(path) => read_path(Path::new(path)),
        None => Ok(arg.to_string()),
    }
}

pub fn read_path(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_stdin() -> Result<String, CliError> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(CliError::Stdin)?;
    Ok(text)
}

/// Parses `text` as JSON, falling back to YAML. `what` names the document in errors.
pub fn parse_document<T: DeserializeOwned>(text: &str, what: &str) -> Result<T, CliError> {
    match serde_json::from_str(text) {
        Ok(v) => Ok(v),
        Err(json_err) => serde_yaml::from_str(text).map_err(|yaml_err| {
            tracing::debug!(%json_err, %yaml_err, what, "document is neither JSON nor YAML");
            CliError::Parse {
                what: what.to_string(),
                message: yaml_err.to_string(),
            }
        }),
    }
}

/// Loads a binding map. An empty document or `null` is an empty map; other non-objects are
/// rejected.
pub fn load_object(arg: &str, what: &str) -> Result<Map<String, Value>, CliError> {
    let text = read_source(arg)?;
    if text.trim().is_empty() {
        return Ok(Map::new());
    }
    match parse_document::<Value>(&text, what)? {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map),
        other => Err(CliError::InvalidInput(format!(
            "{} must be an object, got {}",
            what,
            kind(&other)
        ))),
    }
}

/// Loads a full preview request from a file path (`@` optional) or `-` for stdin.
pub fn load_request(source: &str) -> Result<PreviewRequest, CliError> {
    let text = if source == "-" {
        read_stdin()?
    } else {
        read_path(Path::new(source.strip_prefix('@').unwrap_or(source)))?
    };
    parse_document(&text, "preview request")
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn literal_json_object() {
        let map = load_object(r#"{"name": "Ada", "n": 2}"#, "--input").unwrap();
        assert_eq!(Value::Object(map), json!({"name": "Ada", "n": 2}));
    }

    #[test]
    fn yaml_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name: Ada\ntags:\n  - a\n  - b").unwrap();
        let arg = format!("@{}", file.path().display());
        let map = load_object(&arg, "--input").unwrap();
        assert_eq!(Value::Object(map), json!({"name": "Ada", "tags": ["a", "b"]}));
    }

    #[test]
    fn empty_and_null_are_empty_maps() {
        assert!(load_object("", "--ctx").unwrap().is_empty());
        assert!(load_object("null", "--ctx").unwrap().is_empty());
    }

    #[test]
    fn non_object_is_rejected() {
        let err = load_object("[1, 2]", "--input").unwrap_err();
        assert!(err.to_string().contains("--input must be an object, got an array"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_source("@/no/such/file.json").unwrap_err();
        assert!(err.to_string().contains("/no/such/file.json"));
    }

    #[test]
    fn request_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "template: 'Hi ${{name}}'\nstrictRender: true\ninput:\n  name: Ada"
        )
        .unwrap();
        let req = load_request(&file.path().display().to_string()).unwrap();
        assert_eq!(req.template, "Hi ${name}");
        assert!(req.strict_render);
        assert_eq!(req.input.unwrap()["name"], json!("Ada"));
    }
}
