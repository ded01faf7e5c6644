//! Prompt resolution for an AI operation.
//!
//! Each operation has a built-in (local) template. Its configuration may switch it to
//! `TEMPLATE_OVERRIDE`, in which case a remotely managed template is rendered instead, with the
//! rendered local prompt available to it as `localPrompt`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::bindings::Bindings;
use crate::error::RenderError;
use crate::expr::RenderMode;
use crate::template::TemplateEngine;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromptMode {
    #[default]
    LocalOnly,
    TemplateOverride,
}

impl PromptMode {
    /// Case-insensitive; anything other than `TEMPLATE_OVERRIDE` (including absent) is
    /// `LOCAL_ONLY`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_uppercase()) {
            Some(mode) if mode == "TEMPLATE_OVERRIDE" => PromptMode::TemplateOverride,
            _ => PromptMode::LocalOnly,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptMode::LocalOnly => "LOCAL_ONLY",
            PromptMode::TemplateOverride => "TEMPLATE_OVERRIDE",
        }
    }
}

impl fmt::Display for PromptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prompt settings of one operation type, as stored by the control plane.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationPromptConfig {
    pub operation_type: String,
    #[serde(default)]
    pub prompt_mode: PromptMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,
    #[serde(default)]
    pub strict_render: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptResolveError {
    #[error("local prompt template is empty, operation={0}")]
    EmptyLocalTemplate(String),
    #[error("override prompt template is empty, operation={0}")]
    EmptyOverrideTemplate(String),
    #[error("prompt render failed, operation={operation}: {source}")]
    Render {
        operation: String,
        #[source]
        source: RenderError,
    },
}

/// Adds `extensions` to `input` without replacing keys the input already has.
pub fn merge_input_extensions(input: &mut Map<String, Value>, extensions: Map<String, Value>) {
    for (key, value) in extensions {
        input.entry(key).or_insert(value);
    }
}

/// Produces the prompt an operation should send.
///
/// The local template is always rendered in strict mode. In `TEMPLATE_OVERRIDE` mode the
/// configured template is then rendered with `input`, `localPrompt` and `operationType`,
/// honoring the configured strictness.
pub fn resolve_operation_prompt(
    engine: &TemplateEngine,
    config: &OperationPromptConfig,
    local_template: &str,
    input: Map<String, Value>,
) -> Result<String, PromptResolveError> {
    let operation = config.operation_type.as_str();
    let render_error = |source| PromptResolveError::Render {
        operation: operation.to_string(),
        source,
    };

    let local_template = local_template.trim();
    if local_template.is_empty() {
        return Err(PromptResolveError::EmptyLocalTemplate(operation.to_string()));
    }
    let bindings = Bindings::new(input).with_operation_type(Some(operation.to_string()));
    let local_prompt = engine
        .render(local_template, &bindings, RenderMode::Strict)
        .map_err(render_error)?;

    if config.prompt_mode == PromptMode::LocalOnly {
        tracing::debug!(operation, "using local prompt template");
        return Ok(local_prompt);
    }

    let template = config
        .prompt_template
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| PromptResolveError::EmptyOverrideTemplate(operation.to_string()))?;
    let bindings = bindings.with_local_prompt(Some(local_prompt));
    let rendered = engine
        .render(template, &bindings, RenderMode::from_strict(config.strict_render))
        .map_err(render_error)?;
    tracing::debug!(operation, "using override prompt template");
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prompt_mode_parsing() {
        assert_eq!(PromptMode::parse(None), PromptMode::LocalOnly);
        assert_eq!(
            PromptMode::parse(Some(" template_override ")),
            PromptMode::TemplateOverride
        );
        assert_eq!(PromptMode::parse(Some("other")), PromptMode::LocalOnly);
        let mode: PromptMode = serde_json::from_str("\"TEMPLATE_OVERRIDE\"").unwrap();
        assert_eq!(mode, PromptMode::TemplateOverride);
    }

    #[test]
    fn merge_keeps_existing_keys() {
        let mut input = json!({"a": 1}).as_object().cloned().unwrap();
        let ext = json!({"a": 2, "b": 3}).as_object().cloned().unwrap();
        merge_input_extensions(&mut input, ext);
        assert_eq!(Value::Object(input), json!({"a": 1, "b": 3}));
    }
}
